//! Reading and writing the `MicArray` XML format that beamforming tools use
//! to describe microphone positions. A file looks like this:
//!
//! ```text
//! <?xml version="1.1" encoding="utf-8"?><MicArray name="spiral_geom">
//!   <pos Name="Point 1" x="0.01" y="0" z="0"/>
//!   <pos Name="Point 2" x="0.0115..." y="0.0024..." z="0"/>
//! </MicArray>
//! ```
//!
//! Coordinates are written with the shortest representation that parses
//! back to the same `f64`, so a write followed by a read is exact.
//!
//! The reader is deliberately small. It knows about an optional prolog,
//! comments, one `MicArray` root and `pos` children, either self-closing
//! or with an empty body, which is all these files ever contain.
//! Attributes may come in any order and unknown ones are skipped.

use crate::error::GeomError;
use crate::geometry::{MicGeometry, MicPosition};

use log::{debug, info};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{eof, map, opt},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    Finish, IResult,
};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Array name used when the destination path has no usable file stem.
const DEFAULT_ARRAY_NAME: &str = "array";

/// Writes `positions` to `destination` as a `MicArray` document named
/// after the file stem, replacing whatever was there. Returns the path of
/// the file just written.
pub fn export(
    positions: &[MicPosition],
    destination: impl AsRef<Path>,
) -> Result<PathBuf, GeomError> {
    let destination = destination.as_ref();
    let name = destination
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_ARRAY_NAME);
    write_path(name, positions, destination)
}

/// Reads the geometry stored at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<MicGeometry, GeomError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GeomError::PreconditionFailed(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let geom = parse(&text)?;
    debug!("loaded {} mics from {}", geom.len(), path.display());
    Ok(geom)
}

impl MicGeometry {
    /// Write out a [MicGeometry] under its own name to the path provided.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, GeomError> {
        write_path(self.name(), self.positions(), path.as_ref())
    }

    /// Write out a [MicGeometry] to the [Write]able object provided.
    pub fn to_writer(&self, out: &mut impl Write) -> Result<(), GeomError> {
        write_document(self.name(), self.positions(), out)
    }

    /// Read a [MicGeometry] from the path provided.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GeomError> {
        load(path)
    }
}

fn write_path(name: &str, positions: &[MicPosition], path: &Path) -> Result<PathBuf, GeomError> {
    let mut handle = BufWriter::new(File::create(path)?);
    write_document(name, positions, &mut handle)?;
    handle.flush()?;
    info!("wrote {} mic positions to {}", positions.len(), path.display());
    Ok(path.to_path_buf())
}

fn write_document(
    name: &str,
    positions: &[MicPosition],
    out: &mut impl Write,
) -> Result<(), GeomError> {
    writeln!(
        out,
        "<?xml version=\"1.1\" encoding=\"utf-8\"?><MicArray name=\"{}\">",
        escape(name)
    )?;
    for (i, p) in positions.iter().enumerate() {
        writeln!(
            out,
            "  <pos Name=\"Point {}\" x=\"{}\" y=\"{}\" z=\"{}\"/>",
            i + 1,
            p.x,
            p.y,
            p.z
        )?;
    }
    writeln!(out, "</MicArray>")?;
    Ok(())
}

/// Parses a whole `MicArray` document.
pub fn parse(text: &str) -> Result<MicGeometry, GeomError> {
    let (array_attrs, pos_elems) = match parse_document(text).finish() {
        Ok((_remaining, doc)) => doc,
        Err(nom::error::Error { input, code }) => {
            return Err(GeomError::XmlError(nom::error::Error {
                input: input.chars().take(40).collect(),
                code,
            }))
        }
    };

    let name = lookup(&array_attrs, "name")
        .map(unescape)
        .unwrap_or_default();

    let positions = pos_elems
        .iter()
        .enumerate()
        .map(|(i, attrs)| {
            Ok(MicPosition::new(
                coordinate(attrs, "x", i)?,
                coordinate(attrs, "y", i)?,
                coordinate(attrs, "z", i)?,
            ))
        })
        .collect::<Result<Vec<_>, GeomError>>()?;

    Ok(MicGeometry::new(name, positions))
}

type Attrs<'a> = Vec<(&'a str, &'a str)>;

fn lookup<'a>(attrs: &Attrs<'a>, key: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn coordinate(attrs: &Attrs<'_>, key: &str, idx: usize) -> Result<f64, GeomError> {
    let raw = lookup(attrs, key).ok_or_else(|| {
        GeomError::invalid(format!("pos element {} has no {} attribute", idx + 1, key))
    })?;
    raw.trim().parse::<f64>().map_err(|_| {
        GeomError::invalid(format!(
            "pos element {} has non-numeric {}=\"{}\"",
            idx + 1,
            key,
            raw
        ))
    })
}

fn comment(s: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(s)
}

fn skip_filler(s: &str) -> IResult<&str, ()> {
    map(many0(alt((multispace1, comment))), |_| ())(s)
}

fn prolog(s: &str) -> IResult<&str, &str> {
    delimited(tag("<?xml"), take_until("?>"), tag("?>"))(s)
}

fn xml_name(s: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))(s)
}

fn quoted(s: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
    ))(s)
}

fn attribute(s: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(xml_name, tuple((multispace0, char('='), multispace0)), quoted)(s)
}

fn attributes(s: &str) -> IResult<&str, Attrs<'_>> {
    many0(preceded(multispace1, attribute))(s)
}

fn array_open(s: &str) -> IResult<&str, Attrs<'_>> {
    delimited(tag("<MicArray"), attributes, pair(multispace0, char('>')))(s)
}

fn pos_element(s: &str) -> IResult<&str, Attrs<'_>> {
    delimited(
        tag("<pos"),
        attributes,
        pair(
            multispace0,
            alt((
                tag("/>"),
                preceded(char('>'), preceded(multispace0, tag("</pos>"))),
            )),
        ),
    )(s)
}

fn parse_document(s: &str) -> IResult<&str, (Attrs<'_>, Vec<Attrs<'_>>)> {
    map(
        tuple((
            preceded(skip_filler, opt(prolog)),
            preceded(skip_filler, array_open),
            many0(preceded(skip_filler, pos_element)),
            terminated(
                preceded(skip_filler, tag("</MicArray>")),
                pair(skip_filler, eof),
            ),
        )),
        |(_prolog, array_attrs, pos_elems, _close)| (array_attrs, pos_elems),
    )(s)
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
