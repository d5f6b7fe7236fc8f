//! Line-oriented test scripts.
//!
//! Each line is `NAME:value`. Lines starting with `#` are comments.

use anyhow::{Context, Result, bail};

use reassemble_core::layout::{Alignment, Direction, HAlign, Rgb, VAlign};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Comment,
    /// Family for following text; "Narrow" in the name implies a condensed cut.
    Font(String),
    Escapement(f64),
    Orientation(f64),
    FontSize(f64),
    Position(f64, f64),
    Text(String),
    Align(Alignment),
    Direction(Direction),
    /// Input units to points; also the quantization error.
    Multiplier(f64),
    Italic(i32),
    Weight(i32),
    Condensed(i32),
    Color(Rgb),
    Flags(u32),
    Emit,
    Done,
}

pub fn parse_line(line: &str) -> Result<Directive> {
    if line.starts_with('#') {
        return Ok(Directive::Comment);
    }
    let Some((name, data)) = line.split_once(':').filter(|(name, _)| !name.is_empty()) else {
        bail!("Input line cannot be parsed");
    };

    let directive = match name {
        "FONT" => Directive::Font(data.to_string()),
        "ESC" => Directive::Escapement(number(data).context("Invalid ESC:")?),
        "ORI" => Directive::Orientation(number(data).context("Invalid ORI:")?),
        "FS" => {
            let size = number(data).context("Invalid FS:")?;
            if size <= 0.0 {
                bail!("Invalid FS:");
            }
            Directive::FontSize(size)
        }
        "XY" => {
            let (x, y) = data.split_once(',').context("Invalid XY:")?;
            Directive::Position(number(x).context("Invalid XY:")?, number(y).context("Invalid XY:")?)
        }
        "TEXT" => Directive::Text(data.to_string()),
        "ALN" => Directive::Align(alignment(data).context("Invalid ALN:")?),
        "LDIR" => Directive::Direction(match data.trim() {
            "LR" => Direction::LeftToRight,
            "RL" => Direction::RightToLeft,
            "TB" => Direction::TopToBottom,
            _ => bail!("Invalid LDIR:"),
        }),
        "MUL" => {
            let factor = number(data).context("Invalid MUL:")?;
            if factor <= 0.0 {
                bail!("Invalid MUL:");
            }
            Directive::Multiplier(factor)
        }
        "ITA" => Directive::Italic(integer(data, 0, 110).context("Invalid ITA:")?),
        "WGT" => Directive::Weight(integer(data, 0, 215).context("Invalid WGT:")?),
        "CND" => Directive::Condensed(integer(data, 50, 200).context("Invalid CND:")?),
        "CLR" => {
            let hex = data.trim().trim_start_matches("0x");
            let value = u32::from_str_radix(hex, 16).context("Invalid CLR:")?;
            Directive::Color(Rgb(value))
        }
        "FLAG" => Directive::Flags(data.trim().parse().context("Invalid FLAG:")?),
        "EMIT" => Directive::Emit,
        "DONE" => Directive::Done,
        _ => bail!("Input line cannot be parsed"),
    };
    Ok(directive)
}

fn number(data: &str) -> Result<f64> {
    let value: f64 = data.trim().parse()?;
    if !value.is_finite() {
        bail!("{value} is not finite");
    }
    Ok(value)
}

fn integer(data: &str, min: i32, max: i32) -> Result<i32> {
    let value: i32 = data.trim().parse()?;
    if !(min..=max).contains(&value) {
        bail!("{value} is outside {min}..={max}");
    }
    Ok(value)
}

fn alignment(data: &str) -> Result<Alignment> {
    let mut chars = data.chars();
    let horizontal = match chars.next() {
        Some('L') => HAlign::Left,
        Some('C') => HAlign::Center,
        Some('R') => HAlign::Right,
        other => bail!("unknown horizontal alignment {other:?}"),
    };
    let vertical = match chars.next() {
        Some('T') => VAlign::Top,
        Some('L') => VAlign::Baseline,
        Some('B') => VAlign::Bottom,
        other => bail!("unknown vertical alignment {other:?}"),
    };
    Ok(Alignment::new(horizontal, vertical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directives() {
        assert_eq!(parse_line("# note").unwrap(), Directive::Comment);
        assert_eq!(parse_line("FONT:Arial Narrow").unwrap(), Directive::Font("Arial Narrow".into()));
        assert_eq!(parse_line("XY:10.5,-3").unwrap(), Directive::Position(10.5, -3.0));
        assert_eq!(parse_line("TEXT:a: b").unwrap(), Directive::Text("a: b".into()));
        assert_eq!(
            parse_line("ALN:CB").unwrap(),
            Directive::Align(Alignment::new(HAlign::Center, VAlign::Bottom))
        );
        assert_eq!(parse_line("LDIR:RL").unwrap(), Directive::Direction(Direction::RightToLeft));
        assert_eq!(parse_line("CLR:FF8000").unwrap(), Directive::Color(Rgb(0xFF8000)));
        assert_eq!(parse_line("FLAG:1").unwrap(), Directive::Flags(1));
        assert_eq!(parse_line("DONE:").unwrap(), Directive::Done);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse_line("FS:0").is_err());
        assert!(parse_line("MUL:-1").is_err());
        assert!(parse_line("ITA:111").is_err());
        assert!(parse_line("WGT:216").is_err());
        assert!(parse_line("CND:49").is_err());
        assert!(parse_line("ALN:XB").is_err());
        assert!(parse_line("LDIR:BT").is_err());
    }

    #[test]
    fn rejects_unknown_lines() {
        assert!(parse_line("").is_err());
        assert!(parse_line(":value").is_err());
        assert!(parse_line("LOAD:x").is_err());
        assert!(parse_line("no colon").is_err());
    }
}
