//! Decoder and encoder for the world-state tagged-tree format (NBT).
//!
//! Big-endian throughout. Every value is introduced by a one-byte tag id; compound children
//! also carry a u16-length-prefixed UTF-8 name and the compound ends at a zero tag. Lists
//! declare one element tag and a count, and their elements carry neither tag nor name.
//! Files on disk are gzip containers around a named root.

use camino::Utf8Path;
use flate2::read::GzDecoder;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use thiserror::Error;

/// Nesting limit for compounds and lists.
pub const MAX_DEPTH: usize = 512;

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

/// One decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    /// Homogeneous; every element has the same tag id.
    List(Vec<Tag>),
    /// Children in the order they appeared in the stream.
    Compound(IndexMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

#[derive(Error, Debug)]
pub enum NbtError {
    #[error("Stream ended before the declared data was read")]
    Truncated,

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("Unknown tag id {0}")]
    UnknownTag(u8),

    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("Negative length {0}")]
    NegativeLength(i32),

    #[error("List mixes tag ids {expected} and {found}")]
    HeterogeneousList { expected: u8, found: u8 },

    #[error("Nesting deeper than {MAX_DEPTH}")]
    DepthExceeded,

    #[error("String of {0} bytes exceeds the u16 length prefix")]
    StringTooLong(usize),
}

impl From<io::Error> for NbtError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            NbtError::Truncated
        } else {
            NbtError::Io(err)
        }
    }
}

impl Tag {
    pub fn id(&self) -> u8 {
        match self {
            Tag::Byte(_) => TAG_BYTE,
            Tag::Short(_) => TAG_SHORT,
            Tag::Int(_) => TAG_INT,
            Tag::Long(_) => TAG_LONG,
            Tag::Float(_) => TAG_FLOAT,
            Tag::Double(_) => TAG_DOUBLE,
            Tag::ByteArray(_) => TAG_BYTE_ARRAY,
            Tag::String(_) => TAG_STRING,
            Tag::List(_) => TAG_LIST,
            Tag::Compound(_) => TAG_COMPOUND,
            Tag::IntArray(_) => TAG_INT_ARRAY,
            Tag::LongArray(_) => TAG_LONG_ARRAY,
        }
    }

    pub fn as_compound(&self) -> Option<&IndexMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    /// Child lookup on a compound; `None` for any other variant.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.as_compound().and_then(|map| map.get(key))
    }

    /// Textual form used when a value is compared or displayed.
    pub fn to_display_string(&self) -> String {
        match self {
            Tag::Byte(v) => v.to_string(),
            Tag::Short(v) => v.to_string(),
            Tag::Int(v) => v.to_string(),
            Tag::Long(v) => v.to_string(),
            Tag::Float(v) => v.to_string(),
            Tag::Double(v) => v.to_string(),
            Tag::String(v) => v.clone(),
            Tag::ByteArray(v) => format!("[{} bytes]", v.len()),
            Tag::List(v) => format!("[{} entries]", v.len()),
            Tag::Compound(v) => format!("{{{} entries}}", v.len()),
            Tag::IntArray(v) => format!("[{} ints]", v.len()),
            Tag::LongArray(v) => format!("[{} longs]", v.len()),
        }
    }
}

struct Decoder<R> {
    reader: R,
}

impl<R: Read> Decoder<R> {
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], NbtError> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8, NbtError> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_len(&mut self) -> Result<usize, NbtError> {
        let len = i32::from_be_bytes(self.read_array()?);
        usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))
    }

    fn read_string(&mut self) -> Result<String, NbtError> {
        let len = u16::from_be_bytes(self.read_array()?) as usize;
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|_| NbtError::InvalidUtf8)
    }

    fn read_elements<T>(
        &mut self,
        len: usize,
        mut read_one: impl FnMut(&mut Self) -> Result<T, NbtError>,
    ) -> Result<Vec<T>, NbtError> {
        // Declared counts come from the input; grow as data actually arrives.
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(read_one(self)?);
        }
        Ok(items)
    }

    fn read_payload(&mut self, id: u8, depth: usize) -> Result<Tag, NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::DepthExceeded);
        }

        let tag = match id {
            TAG_BYTE => Tag::Byte(i8::from_be_bytes(self.read_array()?)),
            TAG_SHORT => Tag::Short(i16::from_be_bytes(self.read_array()?)),
            TAG_INT => Tag::Int(i32::from_be_bytes(self.read_array()?)),
            TAG_LONG => Tag::Long(i64::from_be_bytes(self.read_array()?)),
            TAG_FLOAT => Tag::Float(f32::from_be_bytes(self.read_array()?)),
            TAG_DOUBLE => Tag::Double(f64::from_be_bytes(self.read_array()?)),
            TAG_BYTE_ARRAY => {
                let len = self.read_len()?;
                let mut buf = Vec::new();
                (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
                if buf.len() != len {
                    return Err(NbtError::Truncated);
                }
                Tag::ByteArray(buf)
            }
            TAG_STRING => Tag::String(self.read_string()?),
            TAG_LIST => {
                let element_id = self.read_u8()?;
                if element_id > TAG_LONG_ARRAY {
                    return Err(NbtError::UnknownTag(element_id));
                }
                let len = self.read_len()?;
                if element_id == TAG_END && len > 0 {
                    return Err(NbtError::UnknownTag(TAG_END));
                }
                Tag::List(self.read_elements(len, |d| d.read_payload(element_id, depth + 1))?)
            }
            TAG_COMPOUND => {
                let mut map = IndexMap::new();
                loop {
                    let child_id = self.read_u8()?;
                    if child_id == TAG_END {
                        break;
                    }
                    let name = self.read_string()?;
                    let value = self.read_payload(child_id, depth + 1)?;
                    map.insert(name, value);
                }
                Tag::Compound(map)
            }
            TAG_INT_ARRAY => {
                let len = self.read_len()?;
                Tag::IntArray(self.read_elements(len, |d| Ok(i32::from_be_bytes(d.read_array()?)))?)
            }
            TAG_LONG_ARRAY => {
                let len = self.read_len()?;
                Tag::LongArray(self.read_elements(len, |d| Ok(i64::from_be_bytes(d.read_array()?)))?)
            }
            other => return Err(NbtError::UnknownTag(other)),
        };
        Ok(tag)
    }

    fn read_root_id(&mut self) -> Result<u8, NbtError> {
        match self.read_u8()? {
            TAG_END => Err(NbtError::UnknownTag(TAG_END)),
            id => Ok(id),
        }
    }
}

/// Decode a root carrying a name, as stored in world files. Returns `(name, value)`.
pub fn decode<R: Read>(reader: R) -> Result<(String, Tag), NbtError> {
    let mut decoder = Decoder { reader };
    let id = decoder.read_root_id()?;
    let name = decoder.read_string()?;
    let tag = decoder.read_payload(id, 0)?;
    Ok((name, tag))
}

/// Decode a root written without a name (tag id followed directly by the payload).
pub fn decode_unnamed<R: Read>(reader: R) -> Result<Tag, NbtError> {
    let mut decoder = Decoder { reader };
    let id = decoder.read_root_id()?;
    decoder.read_payload(id, 0)
}

/// Decode a named root from gzip-compressed bytes.
pub fn decode_gzip<R: Read>(reader: R) -> Result<(String, Tag), NbtError> {
    decode(GzDecoder::new(reader))
}

/// Open, decompress and decode a world-state file.
pub fn read_gzip_file(path: &Utf8Path) -> Result<(String, Tag), NbtError> {
    let file = File::open(path).map_err(NbtError::Io)?;
    decode_gzip(BufReader::new(file))
}

struct Encoder<W> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    fn write_string(&mut self, value: &str) -> Result<(), NbtError> {
        let len = u16::try_from(value.len()).map_err(|_| NbtError::StringTooLong(value.len()))?;
        self.writer.write_all(&len.to_be_bytes())?;
        self.writer.write_all(value.as_bytes())?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<(), NbtError> {
        let len = i32::try_from(len).map_err(|_| NbtError::NegativeLength(-1))?;
        self.writer.write_all(&len.to_be_bytes())?;
        Ok(())
    }

    fn write_payload(&mut self, tag: &Tag, depth: usize) -> Result<(), NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::DepthExceeded);
        }

        match tag {
            Tag::Byte(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::Short(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::Int(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::Long(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::Float(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::Double(v) => self.writer.write_all(&v.to_be_bytes())?,
            Tag::ByteArray(bytes) => {
                self.write_len(bytes.len())?;
                self.writer.write_all(bytes)?;
            }
            Tag::String(v) => self.write_string(v)?,
            Tag::List(items) => {
                let element_id = items.first().map(Tag::id).unwrap_or(TAG_END);
                if let Some(odd) = items.iter().find(|item| item.id() != element_id) {
                    return Err(NbtError::HeterogeneousList {
                        expected: element_id,
                        found: odd.id(),
                    });
                }
                self.writer.write_all(&[element_id])?;
                self.write_len(items.len())?;
                for item in items {
                    self.write_payload(item, depth + 1)?;
                }
            }
            Tag::Compound(map) => {
                for (name, value) in map {
                    self.writer.write_all(&[value.id()])?;
                    self.write_string(name)?;
                    self.write_payload(value, depth + 1)?;
                }
                self.writer.write_all(&[TAG_END])?;
            }
            Tag::IntArray(values) => {
                self.write_len(values.len())?;
                for v in values {
                    self.writer.write_all(&v.to_be_bytes())?;
                }
            }
            Tag::LongArray(values) => {
                self.write_len(values.len())?;
                for v in values {
                    self.writer.write_all(&v.to_be_bytes())?;
                }
            }
        }
        Ok(())
    }
}

/// Encode `tag` as a named root.
pub fn encode<W: Write>(writer: W, name: &str, tag: &Tag) -> Result<(), NbtError> {
    let mut encoder = Encoder { writer };
    encoder.writer.write_all(&[tag.id()])?;
    encoder.write_string(name)?;
    encoder.write_payload(tag, 0)
}

/// Encode `tag` as a root without a name.
pub fn encode_unnamed<W: Write>(writer: W, tag: &Tag) -> Result<(), NbtError> {
    let mut encoder = Encoder { writer };
    encoder.writer.write_all(&[tag.id()])?;
    encoder.write_payload(tag, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn level_dat_fixture() -> Tag {
        let mut rules = IndexMap::new();
        rules.insert("minecraft:keep_inventory".to_string(), Tag::Byte(1));
        rules.insert("minecraft:random_tick_speed".to_string(), Tag::Int(3));

        let mut data = IndexMap::new();
        data.insert("LevelName".to_string(), Tag::String("world".to_string()));
        data.insert("game_rules".to_string(), Tag::Compound(rules));

        let mut root = IndexMap::new();
        root.insert("Data".to_string(), Tag::Compound(data));
        Tag::Compound(root)
    }

    #[test]
    fn test_hand_written_bytes() {
        // Compound "" { Short "s" = 300, String "n" = "hi" }
        let bytes: &[u8] = &[
            10, 0, 0, //
            2, 0, 1, b's', 0x01, 0x2c, //
            8, 0, 1, b'n', 0, 2, b'h', b'i', //
            0,
        ];
        let (name, tag) = decode(bytes).unwrap();
        assert_eq!(name, "");
        assert_eq!(tag.get("s"), Some(&Tag::Short(300)));
        assert_eq!(tag.get("n"), Some(&Tag::String("hi".to_string())));
    }

    #[test]
    fn test_gzip_named_root() {
        let tree = level_dat_fixture();
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        encode(&mut gz, "", &tree).unwrap();
        let compressed = gz.finish().unwrap();

        let (_, decoded) = decode_gzip(compressed.as_slice()).unwrap();
        let rules = decoded.get("Data").and_then(|d| d.get("game_rules")).unwrap();
        assert_eq!(rules.get("minecraft:keep_inventory").unwrap().to_display_string(), "1");
    }

    #[test]
    fn test_compound_order_preserved() {
        let tree = level_dat_fixture();
        let mut bytes = Vec::new();
        encode_unnamed(&mut bytes, &tree).unwrap();

        let decoded = decode_unnamed(bytes.as_slice()).unwrap();
        let keys: Vec<_> = decoded.get("Data").unwrap().as_compound().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["LevelName", "game_rules"]);
    }

    #[test]
    fn test_unknown_tag_is_error() {
        let bytes: &[u8] = &[10, 0, 0, 13, 0, 1, b'x', 0];
        assert!(matches!(decode(bytes), Err(NbtError::UnknownTag(13))));
    }

    #[test]
    fn test_truncated_stream_is_error() {
        let tree = level_dat_fixture();
        let mut bytes = Vec::new();
        encode(&mut bytes, "", &tree).unwrap();
        bytes.truncate(bytes.len() - 4);

        assert!(matches!(decode(bytes.as_slice()), Err(NbtError::Truncated)));
    }

    #[test]
    fn test_negative_array_length() {
        let bytes: &[u8] = &[11, 0, 0, 0xff, 0xff, 0xff, 0xff];
        assert!(matches!(decode(bytes), Err(NbtError::NegativeLength(-1))));
    }

    #[test]
    fn test_huge_declared_length_does_not_allocate() {
        let bytes: &[u8] = &[7, 0, 0, 0x7f, 0xff, 0xff, 0xff, 1, 2, 3];
        assert!(matches!(decode(bytes), Err(NbtError::Truncated)));
    }

    #[test]
    fn test_heterogeneous_list_rejected_on_encode() {
        let tag = Tag::List(vec![Tag::Int(1), Tag::Byte(2)]);
        let result = encode_unnamed(Vec::new(), &tag);
        assert!(matches!(result, Err(NbtError::HeterogeneousList { expected: 3, found: 1 })));
    }

    #[test]
    fn test_depth_limit() {
        // A list of one list of one list of ...
        let mut bytes = vec![9];
        for _ in 0..(MAX_DEPTH + 2) {
            bytes.extend_from_slice(&[9, 0, 0, 0, 1]);
        }
        assert!(matches!(decode_unnamed(bytes.as_slice()), Err(NbtError::DepthExceeded)));
    }

    #[test]
    fn test_empty_list_with_unknown_element_tag_rejected() {
        // Unnamed list root: element tag 42, length 0.
        let bytes: &[u8] = &[9, 42, 0, 0, 0, 0];
        assert!(matches!(decode_unnamed(bytes), Err(NbtError::UnknownTag(42))));

        let empty_end_list: &[u8] = &[9, 0, 0, 0, 0, 0];
        assert_eq!(decode_unnamed(empty_end_list).unwrap(), Tag::List(Vec::new()));
    }

    #[test]
    fn test_empty_root_rejected() {
        let bytes: &[u8] = &[0];
        assert!(decode_unnamed(bytes).is_err());
    }
}
