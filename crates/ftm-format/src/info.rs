//! INFO block: song title, author and copyright.

use serde::Serialize;

use crate::chunk::{tags, Block};
use crate::cursor::ByteCursor;
use crate::error::Result;

/// Width of each text field.
pub const INFO_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Info {
    pub version: u32,
    pub title: String,
    pub author: String,
    pub copyright: String,
}

impl Info {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let Block { header, mut body } = Block::expect(cursor, tags::INFO)?;
        Ok(Self {
            version: header.version,
            title: body.read_text(INFO_FIELD_LEN)?,
            author: body.read_text(INFO_FIELD_LEN)?,
            copyright: body.read_text(INFO_FIELD_LEN)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::block;

    fn field(text: &str) -> [u8; INFO_FIELD_LEN] {
        let mut out = [0u8; INFO_FIELD_LEN];
        out[..text.len()].copy_from_slice(text.as_bytes());
        out
    }

    #[test]
    fn test_info_decode() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&field("Title"));
        payload.extend_from_slice(&field("Author"));
        payload.extend_from_slice(&field("(c) 2010"));
        let data = block("INFO", 1, &payload);
        let mut cursor = ByteCursor::new(&data);

        let info = Info::decode(&mut cursor).unwrap();
        assert_eq!(info.title, "Title");
        assert_eq!(info.author, "Author");
        assert_eq!(info.copyright, "(c) 2010");
    }

    #[test]
    fn test_full_width_field_without_terminator() {
        let mut payload = vec![b'A'; INFO_FIELD_LEN];
        payload.extend_from_slice(&[0u8; INFO_FIELD_LEN * 2]);
        let data = block("INFO", 1, &payload);
        let mut cursor = ByteCursor::new(&data);

        let info = Info::decode(&mut cursor).unwrap();
        assert_eq!(info.title.len(), INFO_FIELD_LEN);
        assert!(info.author.is_empty());
    }
}
