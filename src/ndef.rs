//! Minimal NFC Data Exchange Format support, enough to pull a text record off a tag.
//!
//! Each record is laid out as:
//!
//! Field          | Size         | Meaning
//! header         | 1            | MB, ME, CF, SR, IL flags and a 3 bit TNF
//! type length    | 1            | Length of the type field
//! payload length | 1 or 4       | 1 byte when SR is set, otherwise 4 bytes big endian
//! id length      | 0 or 1       | Present when IL is set
//! type           | type length  | e.g. `T` for a well-known text record
//! id             | id length    |
//! payload        | payload len  |
//!
//! A text record payload starts with a status byte: bit 7 selects UTF-16 over UTF-8 and bits 0-5
//! hold the length of the language code that follows.

use crate::error::NdefError;

const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

const TEXT_UTF16: u8 = 0x80;
const TEXT_LANG_LEN_MASK: u8 = 0x3f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: u8,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    pub const TNF_EMPTY: u8 = 0x00;
    pub const TNF_WELL_KNOWN: u8 = 0x01;
    pub const TNF_MIME: u8 = 0x02;
    pub const TEXT_TYPE: &'static [u8] = b"T";

    pub fn new(tnf: u8, record_type: &[u8], payload: &[u8]) -> Self {
        Self {
            tnf: tnf & TNF_MASK,
            record_type: record_type.to_vec(),
            id: Vec::new(),
            payload: payload.to_vec(),
        }
    }

    /// A UTF-8 well-known text record
    pub fn text(lang: &str, text: &str) -> Self {
        let lang = &lang.as_bytes()[..lang.len().min(TEXT_LANG_LEN_MASK as usize)];
        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());
        Self::new(Self::TNF_WELL_KNOWN, Self::TEXT_TYPE, &payload)
    }

    pub fn is_text(&self) -> bool {
        self.tnf == Self::TNF_WELL_KNOWN && self.record_type == Self::TEXT_TYPE
    }

    /// The language code of a text record
    pub fn language(&self) -> Result<String, NdefError> {
        let (lang, _) = self.split_text_payload()?;
        String::from_utf8(lang.to_vec()).map_err(|_| NdefError::InvalidText)
    }

    /// The text of a text record, decoded as UTF-8 or UTF-16 according to the status byte
    pub fn text_content(&self) -> Result<String, NdefError> {
        let (_, body) = self.split_text_payload()?;
        if self.payload[0] & TEXT_UTF16 != 0 {
            decode_utf16(body)
        } else {
            String::from_utf8(body.to_vec()).map_err(|_| NdefError::InvalidText)
        }
    }

    fn split_text_payload(&self) -> Result<(&[u8], &[u8]), NdefError> {
        if !self.is_text() {
            return Err(NdefError::NotText);
        }
        let (&status, rest) = self.payload.split_first().ok_or(NdefError::Truncated)?;
        let lang_len = (status & TEXT_LANG_LEN_MASK) as usize;
        if rest.len() < lang_len {
            return Err(NdefError::Truncated);
        }
        Ok(rest.split_at(lang_len))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    /// Parse a raw NDEF message.
    ///
    /// Parsing stops at the record flagged ME. A message that ends cleanly after a record without
    /// the ME flag is accepted too, as some tags leave it unset.
    pub fn parse(buffer: &[u8]) -> Result<Self, NdefError> {
        if buffer.is_empty() {
            return Err(NdefError::Empty);
        }

        let mut reader = Reader { buffer, pos: 0 };
        let mut records = Vec::new();
        loop {
            let header = reader.byte()?;
            if header & FLAG_CF != 0 {
                return Err(NdefError::ChunkedRecord);
            }

            let type_len = reader.byte()? as usize;
            let payload_len = if header & FLAG_SR != 0 {
                reader.byte()? as usize
            } else {
                let b = reader.take(4)?;
                u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize
            };
            let id_len = if header & FLAG_IL != 0 { reader.byte()? as usize } else { 0 };

            let record_type = reader.take(type_len)?.to_vec();
            let id = reader.take(id_len)?.to_vec();
            let payload = reader.take(payload_len)?.to_vec();

            records.push(NdefRecord { tnf: header & TNF_MASK, record_type, id, payload });

            if header & FLAG_ME != 0 || reader.is_empty() {
                break;
            }
        }

        Ok(Self { records })
    }

    /// Serialise the message.
    ///
    /// Fails for an empty message, which `parse` would reject, and for type or id fields longer
    /// than 255 bytes or payloads longer than `u32::MAX`, which the length fields cannot hold.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NdefError> {
        if self.records.is_empty() {
            return Err(NdefError::Empty);
        }

        let mut out = Vec::new();
        let last = self.records.len() - 1;
        for (i, record) in self.records.iter().enumerate() {
            let type_len = u8::try_from(record.record_type.len())
                .map_err(|_| NdefError::FieldTooLong("type"))?;
            let id_len =
                u8::try_from(record.id.len()).map_err(|_| NdefError::FieldTooLong("id"))?;
            let payload_len = u32::try_from(record.payload.len())
                .map_err(|_| NdefError::FieldTooLong("payload"))?;

            let short = payload_len <= u32::from(u8::MAX);
            let mut header = record.tnf & TNF_MASK;
            if i == 0 {
                header |= FLAG_MB;
            }
            if i == last {
                header |= FLAG_ME;
            }
            if short {
                header |= FLAG_SR;
            }
            if id_len > 0 {
                header |= FLAG_IL;
            }

            out.push(header);
            out.push(type_len);
            if short {
                out.push(payload_len as u8);
            } else {
                out.extend_from_slice(&payload_len.to_be_bytes());
            }
            if id_len > 0 {
                out.push(id_len);
            }
            out.extend_from_slice(&record.record_type);
            out.extend_from_slice(&record.id);
            out.extend_from_slice(&record.payload);
        }
        Ok(out)
    }

    /// The text of the first text record, if any
    pub fn first_text(&self) -> Option<Result<String, NdefError>> {
        self.records.iter().find(|r| r.is_text()).map(|r| r.text_content())
    }
}

struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], NdefError> {
        let end = self.pos.checked_add(n).ok_or(NdefError::Truncated)?;
        let bytes = self.buffer.get(self.pos..end).ok_or(NdefError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn byte(&mut self) -> Result<u8, NdefError> {
        Ok(self.take(1)?[0])
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buffer.len()
    }
}

fn decode_utf16(body: &[u8]) -> Result<String, NdefError> {
    if body.len() % 2 != 0 {
        return Err(NdefError::InvalidText);
    }
    let (little_endian, body) = match body {
        [0xff, 0xfe, rest @ ..] => (true, rest),
        [0xfe, 0xff, rest @ ..] => (false, rest),
        _ => (false, body),
    };
    let units: Vec<u16> = body
        .chunks(2)
        .map(|c| {
            if little_endian {
                u16::from_le_bytes([c[0], c[1]])
            } else {
                u16::from_be_bytes([c[0], c[1]])
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| NdefError::InvalidText)
}

#[test]
fn test_parse_text_record() {
    // MB|ME|SR, TNF well-known, type "T", payload "\x02en1027"
    let message = hex::decode("d101075402656e31303237").unwrap();
    let message = NdefMessage::parse(&message).unwrap();
    assert_eq!(message.records.len(), 1);
    let record = &message.records[0];
    assert!(record.is_text());
    assert_eq!(record.language().unwrap(), "en");
    assert_eq!(record.text_content().unwrap(), "1027");
}

#[test]
fn test_parse_utf16_text_record() {
    let mut payload = vec![0x80 | 2];
    payload.extend_from_slice(b"zh");
    payload.extend_from_slice(&[0xfe, 0xff, 0x00, b'a', 0x00, b'1']);
    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &payload);
    assert_eq!(record.text_content().unwrap(), "a1");

    let mut payload = vec![0x80];
    payload.extend_from_slice(&[0xff, 0xfe, b'b', 0x00]);
    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &payload);
    assert_eq!(record.text_content().unwrap(), "b");
}

#[test]
fn test_round_trip_multi_record_message() {
    let message = NdefMessage::new(vec![
        NdefRecord::new(NdefRecord::TNF_MIME, b"application/octet-stream", &[1, 2, 3]),
        NdefRecord::text("en", "102712345678901234010100aabbccdd"),
    ]);
    let bytes = message.to_bytes().unwrap();
    assert_eq!(bytes[0] & (FLAG_MB | FLAG_ME), FLAG_MB);
    let parsed = NdefMessage::parse(&bytes).unwrap();
    assert_eq!(parsed, message);
    assert_eq!(
        parsed.first_text(),
        Some(Ok("102712345678901234010100aabbccdd".to_string()))
    );
}

#[test]
fn test_long_payload_uses_four_byte_length() {
    let text = "0".repeat(300);
    let message = NdefMessage::new(vec![NdefRecord::text("en", &text)]);
    let bytes = message.to_bytes().unwrap();
    assert_eq!(bytes[0] & FLAG_SR, 0);
    assert_eq!(NdefMessage::parse(&bytes).unwrap().first_text(), Some(Ok(text)));
}

#[test]
fn test_parse_errors() {
    assert_eq!(NdefMessage::parse(&[]), Err(NdefError::Empty));
    assert_eq!(NdefMessage::parse(&[0xd1, 0x01, 0x07, 0x54, 0x02]), Err(NdefError::Truncated));
    assert_eq!(NdefMessage::parse(&[0xb1, 0x01, 0x00, 0x54]), Err(NdefError::ChunkedRecord));
}

#[test]
fn test_non_text_record() {
    let record = NdefRecord::new(NdefRecord::TNF_MIME, b"text/plain", b"hello");
    assert_eq!(record.text_content(), Err(NdefError::NotText));
    assert_eq!(NdefMessage::new(vec![record]).first_text(), None);
}

#[test]
fn test_oversized_fields_are_rejected() {
    let record = NdefRecord::new(NdefRecord::TNF_MIME, &[b'a'; 300], b"x");
    let message = NdefMessage::new(vec![record]);
    assert_eq!(message.to_bytes(), Err(NdefError::FieldTooLong("type")));

    let mut record = NdefRecord::text("en", "ff");
    record.id = vec![0; 256];
    assert_eq!(NdefMessage::new(vec![record]).to_bytes(), Err(NdefError::FieldTooLong("id")));

    let record = NdefRecord::new(NdefRecord::TNF_MIME, &[b'a'; 255], b"x");
    let message = NdefMessage::new(vec![record]);
    assert_eq!(NdefMessage::parse(&message.to_bytes().unwrap()).unwrap(), message);
}

#[test]
fn test_empty_message_is_rejected_both_ways() {
    assert_eq!(NdefMessage::default().to_bytes(), Err(NdefError::Empty));
    assert_eq!(NdefMessage::parse(&[]), Err(NdefError::Empty));
}

#[test]
fn test_record_with_id_round_trips() {
    let mut record = NdefRecord::text("en", "1027");
    record.id = b"tag-1".to_vec();
    let message = NdefMessage::new(vec![record]);
    let bytes = message.to_bytes().unwrap();
    assert_ne!(bytes[0] & FLAG_IL, 0);
    assert_eq!(NdefMessage::parse(&bytes).unwrap(), message);
}

#[test]
fn test_odd_length_utf16_is_invalid() {
    let payload = [0x80, 0x00, b'a', 0x00];
    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &payload);
    assert_eq!(record.text_content(), Err(NdefError::InvalidText));
}

#[test]
fn test_language_longer_than_payload() {
    // status claims a 5 byte language code, only "en" follows
    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &[0x05, b'e', b'n']);
    assert_eq!(record.text_content(), Err(NdefError::Truncated));
    assert_eq!(record.language(), Err(NdefError::Truncated));

    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &[]);
    assert_eq!(record.text_content(), Err(NdefError::Truncated));
}

#[test]
fn test_invalid_utf8_text() {
    let record = NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"T", &[0x00, 0xff, 0xfe]);
    assert_eq!(record.text_content(), Err(NdefError::InvalidText));
}
