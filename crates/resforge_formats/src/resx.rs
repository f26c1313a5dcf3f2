//! The XML resource format.
//!
//! Documents have a `<root>` element holding `<resheader>` entries (ignored
//! on read, emitted on write) and `<data>` entries:
//!
//! ```xml
//! <data name="Greeting" xml:space="preserve">
//!   <value>Hello</value>
//!   <comment>shown on the start page</comment>
//! </data>
//! <data name="Logo" type="System.Resources.ResXFileRef, System.Windows.Forms">
//!   <value>images/logo.bmp;System.Byte[], mscorlib</value>
//! </data>
//! ```

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::FormatError;
use crate::model::{Resource, ResourceSet, ResourceValue};

/// Mimetype marking hex-encoded byte arrays.
pub const HEX_MIMETYPE: &str = "application/x-resforge.hex";
const FILE_REF_TYPE: &str = "System.Resources.ResXFileRef";
const BYTES_TYPE: &str = "System.Byte[], mscorlib";

/// A resx document read into memory.
#[derive(Debug, Default)]
pub struct ResxDocument {
    /// The resources.
    pub set: ResourceSet,
    /// Files linked through file references, resolved against the document.
    pub linked: Vec<PathBuf>,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct PendingData {
    name: String,
    type_name: Option<String>,
    mimetype: Option<String>,
    value: String,
    comment: Option<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Value,
    Comment,
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> FormatError {
    FormatError::Xml(format!("{err} (at byte {})", reader.buffer_position()))
}

impl PendingData {
    fn from_start(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, FormatError> {
        let mut data = PendingData::default();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| xml_error(reader, err))?;
            let value = attr
                .unescape_value()
                .map_err(|err| xml_error(reader, err))?
                .into_owned();
            match attr.key.as_ref() {
                b"name" => data.name = value,
                b"type" => data.type_name = Some(value),
                b"mimetype" => data.mimetype = Some(value),
                _ => {}
            }
        }
        if data.name.is_empty() {
            return Err(xml_error(reader, "<data> element without a name"));
        }
        Ok(data)
    }

    fn push_text(&mut self, field: Field, text: &str) {
        match field {
            Field::Value => self.value.push_str(text),
            Field::Comment => self.comment.get_or_insert_with(String::new).push_str(text),
        }
    }
}

/// Parses a resx document.
///
/// `base_dir` anchors file references; `references` are the reference
/// assemblies that may satisfy typed values.
pub fn read(content: &str, base_dir: &Path, references: &[PathBuf]) -> Result<ResxDocument, FormatError> {
    let mut reader = Reader::from_str(content);
    let mut doc = ResxDocument::default();
    let mut seen_root = false;
    let mut current: Option<PendingData> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|err| xml_error(&reader, err))?;
        match event {
            Event::Start(e) | Event::Empty(e) if !seen_root => {
                if e.name().as_ref() != b"root" {
                    let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(FormatError::Xml(format!(
                        "document element is <{found}>, expected <root>"
                    )));
                }
                seen_root = true;
            }
            Event::Start(e) => match e.name().as_ref() {
                b"data" if current.is_none() => current = Some(PendingData::from_start(&e, &reader)?),
                b"value" if current.is_some() => field = Some(Field::Value),
                b"comment" if current.is_some() => field = Some(Field::Comment),
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"data" && current.is_none() {
                    let data = PendingData::from_start(&e, &reader)?;
                    finish(data, base_dir, references, &mut doc)?;
                }
            }
            Event::Text(t) => {
                if let (Some(data), Some(f)) = (current.as_mut(), field) {
                    let text = t.unescape().map_err(|err| xml_error(&reader, err))?;
                    data.push_text(f, &text);
                }
            }
            Event::CData(c) => {
                if let (Some(data), Some(f)) = (current.as_mut(), field) {
                    data.push_text(f, &String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"value" | b"comment" => field = None,
                b"data" => {
                    if let Some(data) = current.take() {
                        finish(data, base_dir, references, &mut doc)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(FormatError::Xml("document has no <root> element".to_string()));
    }
    Ok(doc)
}

fn finish(
    data: PendingData,
    base_dir: &Path,
    references: &[PathBuf],
    doc: &mut ResxDocument,
) -> Result<(), FormatError> {
    let name = data.name;
    let value = match (data.mimetype.as_deref(), data.type_name) {
        (Some(HEX_MIMETYPE), _) => {
            let bytes = hex::decode(data.value.trim()).map_err(|e| {
                FormatError::Xml(format!("resource '{name}' has invalid hex data: {e}"))
            })?;
            ResourceValue::Bytes(bytes)
        }
        (Some(other), _) => {
            return Err(FormatError::Xml(format!(
                "resource '{name}' uses unsupported mimetype '{other}'"
            )));
        }
        (None, Some(type_name)) if type_name.starts_with(FILE_REF_TYPE) => {
            let (path, value) = read_file_ref(&name, &data.value, base_dir)?;
            doc.linked.push(path);
            value
        }
        (None, Some(type_name)) => {
            if !type_resolves(&type_name, references) {
                return Err(FormatError::UnresolvedType { name, type_name });
            }
            if type_base(&type_name) == "System.String" {
                ResourceValue::String(data.value)
            } else {
                ResourceValue::Typed {
                    type_name,
                    value: data.value,
                }
            }
        }
        (None, None) => ResourceValue::String(data.value),
    };

    let resource = Resource {
        name,
        value,
        comment: data.comment,
    };
    let name = resource.name.clone();
    if !doc.set.insert(resource) {
        doc.warnings.push(format!(
            "duplicate resource name '{name}'; the first definition is kept"
        ));
    }
    Ok(())
}

fn type_base(type_name: &str) -> &str {
    type_name.split(',').next().unwrap_or_default().trim()
}

/// A typed value is usable if its assembly is the core library or one of
/// the references, matched by file stem.
fn type_resolves(type_name: &str, references: &[PathBuf]) -> bool {
    let Some(assembly) = type_name.split(',').nth(1).map(str::trim) else {
        return true;
    };
    assembly.eq_ignore_ascii_case("mscorlib")
        || references.iter().any(|r| {
            r.file_stem()
                .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(assembly))
        })
}

fn read_file_ref(name: &str, spec: &str, base_dir: &Path) -> Result<(PathBuf, ResourceValue), FormatError> {
    let mut parts = spec.split(';').map(str::trim);
    let rel = parts.next().unwrap_or_default();
    let Some(target_type) = parts.next().filter(|t| !t.is_empty()) else {
        return Err(FormatError::Xml(format!(
            "file reference of resource '{name}' has no type"
        )));
    };
    let path = base_dir.join(rel);
    let linked_err = |source| FormatError::LinkedFile {
        name: name.to_string(),
        path: path.clone(),
        source,
    };
    let value = if type_base(target_type) == "System.String" {
        ResourceValue::String(std::fs::read_to_string(&path).map_err(linked_err)?)
    } else {
        ResourceValue::Bytes(std::fs::read(&path).map_err(linked_err)?)
    };
    Ok((path, value))
}

/// Writes a resource set as a resx document.
pub fn write(set: &ResourceSet) -> Result<String, FormatError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let w = &mut writer;

    emit(w, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(w, Event::Start(BytesStart::new("root")))?;
    for (name, value) in [
        ("resmimetype", "text/microsoft-resx"),
        ("version", "2.0"),
        ("reader", "System.Resources.ResXResourceReader, System.Windows.Forms"),
        ("writer", "System.Resources.ResXResourceWriter, System.Windows.Forms"),
    ] {
        emit(w, Event::Start(BytesStart::new("resheader").with_attributes([("name", name)])))?;
        text_element(w, "value", value)?;
        emit(w, Event::End(BytesEnd::new("resheader")))?;
    }

    for resource in set.iter() {
        let mut start = BytesStart::new("data").with_attributes([("name", resource.name.as_str())]);
        let encoded;
        let value = match &resource.value {
            ResourceValue::String(s) => {
                start.push_attribute(("xml:space", "preserve"));
                s.as_str()
            }
            ResourceValue::Bytes(bytes) => {
                start.push_attribute(("type", BYTES_TYPE));
                start.push_attribute(("mimetype", HEX_MIMETYPE));
                encoded = hex::encode(bytes);
                encoded.as_str()
            }
            ResourceValue::Typed { type_name, value } => {
                start.push_attribute(("type", type_name.as_str()));
                start.push_attribute(("xml:space", "preserve"));
                value.as_str()
            }
        };
        emit(w, Event::Start(start))?;
        text_element(w, "value", value)?;
        if let Some(comment) = &resource.comment {
            text_element(w, "comment", comment)?;
        }
        emit(w, Event::End(BytesEnd::new("data")))?;
    }
    emit(w, Event::End(BytesEnd::new("root")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| FormatError::Xml(e.to_string()))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), FormatError> {
    writer
        .write_event(event)
        .map_err(|e| FormatError::Xml(e.to_string()))
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), FormatError> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}
