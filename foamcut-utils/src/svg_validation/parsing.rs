//! Text-level SVG parsing: root attributes, path data and path geometry

use std::sync::LazyLock;

use foamcut::geometry::primitives::Point;
use log::debug;
use regex::Regex;

/// Number of straight segments a Bézier curve is flattened into
pub const BEZIER_SEGMENTS: usize = 8;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?").unwrap());

static SVG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<svg\b[^>]*>").unwrap());

static PATH_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<path\b[^>]*>").unwrap());

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\s([A-Za-z_:][-\w:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[MmLlHhVvCcSsQqTtAaZz]|[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?")
        .unwrap()
});

/// All numbers in a path's `d` attribute, in order of appearance.
///
/// Commands are skipped and the result is meant to be read as alternating x and y values.
/// Arc flags and the single argument of `H`/`V` break this pairing, which makes the bounds derived
/// from it an approximation.
pub fn extract_path_coordinates(d: &str) -> Vec<f64> {
    NUMBER
        .find_iter(d)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Value of attribute `name` on the root `<svg>` element, either quote style.
pub fn svg_root_attribute(svg: &str, name: &str) -> Option<String> {
    let tag = SVG_TAG.find(svg)?;
    attribute_value(tag.as_str(), name).map(|(value, _)| value.to_string())
}

/// Returns a copy of `svg` with attribute `name` of the root `<svg>` element set to `value`.
/// The attribute is added when absent. `None` if the document has no `<svg>` element.
pub fn set_svg_root_attribute(svg: &str, name: &str, value: &str) -> Option<String> {
    let tag = SVG_TAG.find(svg)?;
    let mut out = String::with_capacity(svg.len() + name.len() + value.len() + 4);
    match attribute_value(tag.as_str(), name) {
        Some((_, range)) => {
            out.push_str(&svg[..tag.start() + range.start]);
            out.push_str(value);
            out.push_str(&svg[tag.start() + range.end..]);
        }
        None => {
            //right after "<svg"
            let insert_at = tag.start() + 4;
            out.push_str(&svg[..insert_at]);
            out.push_str(&format!(" {name}=\"{value}\""));
            out.push_str(&svg[insert_at..]);
        }
    }
    Some(out)
}

/// The `d` attribute of every `<path>` element, in document order
pub fn path_data(svg: &str) -> Vec<String> {
    PATH_TAG
        .find_iter(svg)
        .map(|tag| {
            attribute_value(tag.as_str(), "d")
                .map(|(value, _)| value.to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Finds attribute `name` in a single tag, returns its value and the byte range of the value within the tag
fn attribute_value<'a>(tag: &'a str, name: &str) -> Option<(&'a str, std::ops::Range<usize>)> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| (m.as_str(), m.range()))
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathToken {
    Command(char),
    Number(f64),
}

fn tokenize(d: &str) -> Vec<PathToken> {
    PATH_TOKEN
        .find_iter(d)
        .filter_map(|m| {
            let s = m.as_str();
            match s.chars().next() {
                Some(c) if c.is_ascii_alphabetic() => Some(PathToken::Command(c)),
                _ => s.parse::<f64>().ok().map(PathToken::Number),
            }
        })
        .collect()
}

/// Takes `n` numeric arguments starting at `start`, `None` if fewer are available
fn take_args(tokens: &[PathToken], start: usize, n: usize) -> Option<Vec<f64>> {
    let slice = tokens.get(start..start + n)?;
    slice
        .iter()
        .map(|t| match t {
            PathToken::Number(v) => Some(*v),
            PathToken::Command(_) => None,
        })
        .collect()
}

/// Parses path data into its sub-paths, each a list of absolute points.
///
/// Supports all SVG path commands in absolute and relative form. Cubic and quadratic curves are
/// flattened into [`BEZIER_SEGMENTS`] segments, elliptical arcs are replaced by a straight line to
/// their end point. Consecutive duplicates and closing points are removed.
pub fn parse_svg_path(d: &str) -> Vec<Vec<Point>> {
    let tokens = tokenize(d);
    let mut subpaths = vec![];
    let mut current: Vec<Point> = vec![];

    let mut pos = Point(0.0, 0.0);
    let mut start = Point(0.0, 0.0);
    //last control point of a curve, used by the smooth variants
    let mut last_ctrl: Option<(char, Point)> = None;
    let mut cmd: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let c = match tokens[i] {
            PathToken::Command(c) => {
                i += 1;
                c
            }
            PathToken::Number(_) => match cmd {
                //implicit repetition, extra pairs after a moveto are linetos
                Some('M') => 'L',
                Some('m') => 'l',
                Some(c) => c,
                None => {
                    i += 1;
                    continue;
                }
            },
        };
        cmd = Some(c);
        let rel = c.is_ascii_lowercase();
        let abs = |x: f64, y: f64| match rel {
            true => Point(pos.0 + x, pos.1 + y),
            false => Point(x, y),
        };

        let upper = c.to_ascii_uppercase();
        let n_args = match upper {
            'Z' => 0,
            'H' | 'V' => 1,
            'M' | 'L' | 'T' => 2,
            'S' | 'Q' => 4,
            'C' => 6,
            'A' => 7,
            _ => unreachable!("tokenizer only yields path commands"),
        };
        let Some(args) = take_args(&tokens, i, n_args) else {
            debug!("incomplete arguments for path command {c} at token {i}");
            break;
        };
        i += n_args;

        let mut ctrl = None;
        match upper {
            'M' => {
                flush(&mut subpaths, &mut current);
                pos = abs(args[0], args[1]);
                start = pos;
                current.push(pos);
            }
            'L' => {
                pos = line_to(&mut current, pos, abs(args[0], args[1]));
            }
            'H' => {
                let x = if rel { pos.0 + args[0] } else { args[0] };
                pos = line_to(&mut current, pos, Point(x, pos.1));
            }
            'V' => {
                let y = if rel { pos.1 + args[0] } else { args[0] };
                pos = line_to(&mut current, pos, Point(pos.0, y));
            }
            'C' => {
                let (c1, c2, end) = (
                    abs(args[0], args[1]),
                    abs(args[2], args[3]),
                    abs(args[4], args[5]),
                );
                flatten_cubic(&mut current, pos, c1, c2, end);
                ctrl = Some(('C', c2));
                pos = end;
            }
            'S' => {
                let c1 = reflect(last_ctrl, 'C', pos);
                let (c2, end) = (abs(args[0], args[1]), abs(args[2], args[3]));
                flatten_cubic(&mut current, pos, c1, c2, end);
                ctrl = Some(('C', c2));
                pos = end;
            }
            'Q' => {
                let (c1, end) = (abs(args[0], args[1]), abs(args[2], args[3]));
                flatten_quadratic(&mut current, pos, c1, end);
                ctrl = Some(('Q', c1));
                pos = end;
            }
            'T' => {
                let c1 = reflect(last_ctrl, 'Q', pos);
                let end = abs(args[0], args[1]);
                flatten_quadratic(&mut current, pos, c1, end);
                ctrl = Some(('Q', c1));
                pos = end;
            }
            'A' => {
                pos = line_to(&mut current, pos, abs(args[5], args[6]));
            }
            'Z' => {
                flush(&mut subpaths, &mut current);
                pos = start;
                cmd = None;
            }
            _ => unreachable!(),
        }
        last_ctrl = ctrl;
    }
    flush(&mut subpaths, &mut current);
    subpaths
}

fn line_to(current: &mut Vec<Point>, from: Point, to: Point) -> Point {
    if current.is_empty() {
        current.push(from);
    }
    current.push(to);
    to
}

fn reflect(last_ctrl: Option<(char, Point)>, kind: char, pos: Point) -> Point {
    match last_ctrl {
        Some((k, Point(x, y))) if k == kind => Point(2.0 * pos.0 - x, 2.0 * pos.1 - y),
        _ => pos,
    }
}

fn flatten_cubic(current: &mut Vec<Point>, p0: Point, c1: Point, c2: Point, p3: Point) {
    for s in 1..=BEZIER_SEGMENTS {
        let t = s as f64 / BEZIER_SEGMENTS as f64;
        let mt = 1.0 - t;
        let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        let p = Point(
            a * p0.0 + b * c1.0 + c * c2.0 + d * p3.0,
            a * p0.1 + b * c1.1 + c * c2.1 + d * p3.1,
        );
        line_to(current, p0, p);
    }
}

fn flatten_quadratic(current: &mut Vec<Point>, p0: Point, c1: Point, p2: Point) {
    for s in 1..=BEZIER_SEGMENTS {
        let t = s as f64 / BEZIER_SEGMENTS as f64;
        let mt = 1.0 - t;
        let (a, b, c) = (mt * mt, 2.0 * mt * t, t * t);
        let p = Point(
            a * p0.0 + b * c1.0 + c * p2.0,
            a * p0.1 + b * c1.1 + c * p2.1,
        );
        line_to(current, p0, p);
    }
}

/// Moves the finished sub-path into `subpaths`, after removing consecutive duplicates and the closing point
fn flush(subpaths: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    let mut cleaned: Vec<Point> = Vec::with_capacity(current.len());
    for p in current.drain(..) {
        if cleaned.last() != Some(&p) {
            cleaned.push(p);
        }
    }
    if cleaned.len() > 1 && cleaned.first() == cleaned.last() {
        cleaned.pop();
    }
    if !cleaned.is_empty() {
        subpaths.push(cleaned);
    }
}
