//! SVG Converter - writes reassembled paragraphs as SVG text.
//!
//! Each paragraph becomes one `<text>` element, each of its lines a
//! `<tspan sodipodi:role="line">` and each chunk an inner `<tspan>` placed
//! relative to the previous chunk of its line.

use std::fmt::Write as _;

use crate::arena::{ComplexId, RecordId};
use crate::error::{ReassembleError, Result};
use crate::font::weight_to_css;
use crate::layout::chunk::TextRecord;
use crate::layout::complex::{Complex, ComplexKind};
use crate::layout::geometry::Justification;
use crate::layout::session::Session;
use crate::utils::enc;

/// SVG pixels per point.
pub const PX_PER_PT: f64 = 1.25;

/// Line height used when a paragraph has no measured spacing, in percent.
pub const DEFAULT_LINE_HEIGHT: f64 = 125.0;

/// Renders the paragraphs of an analyzed session.
pub struct SvgConverter<'a> {
    session: &'a Session,
    out: String,
}

impl<'a> SvgConverter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            out: String::new(),
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Renders every paragraph in creation order.
    pub fn render(mut self) -> Result<String> {
        let session = self.session;
        for (id, para) in session.complexes().paragraphs() {
            self.render_paragraph(id, para)?;
        }
        Ok(self.out)
    }

    fn render_paragraph(&mut self, id: ComplexId, para: &Complex) -> Result<()> {
        let session = self.session;
        let ComplexKind::Paragraph(justification) = para.kind else {
            return Err(ReassembleError::Internal(format!("complex {id} is not a paragraph")));
        };
        let lines = para
            .lines()
            .ok_or_else(|| ReassembleError::Internal(format!("paragraph {id} holds records")))?;

        for (j, line_id) in lines.iter().enumerate() {
            if j > 0 {
                self.write("</tspan>");
            }
            let line = &session.complexes()[line_id];
            let line_rect = session.rects().rect(line.rect)?;
            let recenter = match justification {
                Justification::Center => line_rect.width() / 2.0,
                Justification::Right => line_rect.width(),
                Justification::Left | Justification::Unknown => 0.0,
            };
            let records = line
                .records()
                .ok_or_else(|| ReassembleError::Internal(format!("line {line_id} holds lines")))?;

            let mut last: Option<(RecordId, f64, f64)> = None;
            for record_id in records.iter() {
                let record = &session.records()[record_id];
                let rect = session.rects().rect(record.rect)?;
                let base = rect.bottom - record.boff;

                if last.is_none() {
                    let x = PX_PER_PT * (rect.left + recenter);
                    let y = PX_PER_PT * base;
                    if j == 0 {
                        self.open_text(record, justification, x, y);
                    }
                    let _ = write!(self.out, "<tspan sodipodi:role=\"line\"\nx=\"{x:.6}\" y=\"{y:.6}\"\n>");
                }

                let (dx, dy) = match last {
                    Some((prev, lastx, lasty)) => {
                        let mut dx = PX_PER_PT * (rect.left - lastx) + session.kern_gap(prev, record_id);
                        let dy = PX_PER_PT * (base - lasty);
                        // A bad font substitution overruns the next chunk on the same baseline.
                        let q = PX_PER_PT * 0.25 * self.space_advance(record);
                        if dy.abs() <= q && dx < -2.0 * q {
                            dx = 0.0;
                        }
                        (dx, dy)
                    }
                    None => (0.0, 0.0),
                };

                self.write("<tspan\n");
                let _ = write!(self.out, "dx=\"{dx:.6}\" dy=\"{dy:.6}\" ");
                let _ = write!(self.out, "style=\"fill:{};", record.color);
                self.write_font_style(record);
                let _ = write!(self.out, "font-family:{};\"", enc(self.family(record)));
                self.write("\n>");
                self.write(&enc(&record.text));
                self.write("</tspan>");
                last = Some((record_id, rect.right, base));
            }
        }
        self.write("</tspan></text>\n");
        Ok(())
    }

    fn open_text(&mut self, record: &TextRecord, justification: Justification, x: f64, y: f64) {
        let line_height = record.vadvance.map_or(DEFAULT_LINE_HEIGHT, |v| v * 100.0);
        self.write("<text\n");
        self.write("xml:space=\"preserve\"\n");
        self.write("style=\"");
        self.write_font_style(record);
        let _ = write!(self.out, "line-height:{line_height:.6}%;");
        self.write("letter-spacing:0px;word-spacing:0px;fill:#000000;fill-opacity:1;stroke:none;");
        let _ = write!(self.out, "font-family:{};", enc(self.family(record)));
        if let Some((align, anchor)) = justification.text_anchor() {
            let _ = write!(self.out, "text-align:{align};text-anchor:{anchor};");
        }
        self.write("\"\n");

        let (escapement, ox, oy) = self
            .session
            .origin()
            .map_or((0.0, 0.0, 0.0), |o| (o.escapement, o.x, o.y));
        let (sin, cos) = escapement.to_radians().sin_cos();
        let _ = write!(
            self.out,
            "transform=\"matrix({cos:.6},{:.6},{sin:.6},{cos:.6},{:.6},{:.6})\"\n",
            -sin,
            PX_PER_PT * ox,
            PX_PER_PT * oy
        );
        let _ = write!(self.out, "x=\"{x:.6}\" y=\"{y:.6}\"\n>");
    }

    fn write_font_style(&mut self, record: &TextRecord) {
        let style = &record.style;
        let _ = write!(self.out, "font-size:{:.6}px;", style.size * PX_PER_PT);
        let _ = write!(
            self.out,
            "font-style:{};",
            if style.is_italic() { "italic" } else { "normal" }
        );
        self.write("font-variant:normal;");
        let _ = write!(self.out, "font-weight:{};", weight_to_css(style.weight));
        let _ = write!(
            self.out,
            "font-stretch:{};",
            if style.condensed == 100 { "Normal" } else { "Condensed" }
        );
    }

    /// Family as requested, the part of the query before its first `:`.
    fn family(&self, record: &TextRecord) -> &'a str {
        let session = self.session;
        session
            .fonts()
            .get(record.font)
            .map_or("", |font| font.query().split(':').next().unwrap_or_default())
    }

    fn space_advance(&self, record: &TextRecord) -> f64 {
        self.session
            .fonts()
            .get(record.font)
            .map_or(0.0, |font| font.space_advance())
    }
}

/// Serializes the analyzed run and appends it to the session's output.
///
/// Returns the number of bytes appended.
pub fn emit_svg(session: &mut Session) -> Result<usize> {
    let text = SvgConverter::new(session).render()?;
    session.append_out(&text)?;
    Ok(text.len())
}

/// Document prologue written once before the first run.
pub fn svg_document_header() -> &'static str {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
        "<!-- Created with Inkscape (http://www.inkscape.org/) -->\n",
        "\n",
        "<svg\n",
        "   xmlns:dc=\"http://purl.org/dc/elements/1.1/\"\n",
        "   xmlns:cc=\"http://creativecommons.org/ns#\"\n",
        "   xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n",
        "   xmlns:svg=\"http://www.w3.org/2000/svg\"\n",
        "   xmlns=\"http://www.w3.org/2000/svg\"\n",
        "   xmlns:sodipodi=\"http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd\"\n",
        "   xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\"\n",
        "   width=\"900\"\n",
        "   height=\"675\"\n",
        "   id=\"svg4122\"\n",
        "   version=\"1.1\"\n",
        "   inkscape:version=\"0.48+devel r11679 custom\"\n",
        "   sodipodi:docname=\"simplest_text.svg\">\n",
        "  <defs\n",
        "     id=\"defs4124\" />\n",
        "  <sodipodi:namedview\n",
        "     id=\"base\"\n",
        "     pagecolor=\"#ffffff\"\n",
        "     bordercolor=\"#666666\"\n",
        "     borderopacity=\"1.0\"\n",
        "     inkscape:pageopacity=\"0.0\"\n",
        "     inkscape:pageshadow=\"2\"\n",
        "     inkscape:zoom=\"0.98994949\"\n",
        "     inkscape:cx=\"309.88761\"\n",
        "     inkscape:cy=\"482.63995\"\n",
        "     inkscape:document-units=\"px\"\n",
        "     inkscape:current-layer=\"layer1\"\n",
        "     showgrid=\"false\"\n",
        "     width=\"0px\"\n",
        "     height=\"0px\"\n",
        "     fit-margin-top=\"0\"\n",
        "     fit-margin-left=\"0\"\n",
        "     fit-margin-right=\"0\"\n",
        "     fit-margin-bottom=\"0\"\n",
        "     units=\"in\"\n",
        "     inkscape:window-width=\"1200\"\n",
        "     inkscape:window-height=\"675\"\n",
        "     inkscape:window-x=\"26\"\n",
        "     inkscape:window-y=\"51\"\n",
        "     inkscape:window-maximized=\"0\" />\n",
        "  <metadata\n",
        "     id=\"metadata4127\">\n",
        "    <rdf:RDF>\n",
        "      <cc:Work\n",
        "         rdf:about=\"\">\n",
        "        <dc:format>image/svg+xml</dc:format>\n",
        "        <dc:type\n",
        "           rdf:resource=\"http://purl.org/dc/dcmitype/StillImage\" />\n",
        "        <dc:title></dc:title>\n",
        "      </cc:Work>\n",
        "    </rdf:RDF>\n",
        "  </metadata>\n",
        "  <g\n",
        "     inkscape:label=\"Layer 1\"\n",
        "     inkscape:groupmode=\"layer\"\n",
        "     id=\"layer1\"\n",
        "     transform=\"translate(0,0)\">\n",
        "\n",
    )
}

/// Document epilogue written once after the last run.
pub fn svg_document_footer() -> &'static str {
    "  </g>\n</svg>\n"
}
