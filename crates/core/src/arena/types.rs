use super::store::StoreId;

macro_rules! store_ids {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
            pub struct $name(pub usize);

            impl StoreId for $name {
                #[inline]
                fn from_index(index: usize) -> Self {
                    Self(index)
                }

                #[inline]
                fn index(self) -> usize {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

store_ids! {
    /// Slot in the bounding-rectangle store.
    RectId;
    /// Slot in the text-record store, one per loaded chunk.
    RecordId;
    /// Slot in the complex store.
    ComplexId;
    /// Resolved font in the registry.
    FontId;
}
