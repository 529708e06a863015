use crate::cursor::TagCursor;
use crate::error::TagDecodeError;
use std::borrow::Cow;

/// Deepest list/compound nesting `skip_payload` walks through.
pub const MAX_DEPTH: usize = 512;

/// Tag kinds of the binary tag stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
}

impl TagType {
    pub fn from_id(type_id: u8) -> Option<TagType> {
        use TagType::*;
        let tag_type = match type_id {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            _ => return None,
        };

        Some(tag_type)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Payload width of types that carry no length prefix.
    fn fixed_width(self) -> Option<usize> {
        use TagType::*;
        match self {
            End => Some(0),
            Byte => Some(1),
            Short => Some(2),
            Int | Float => Some(4),
            Long | Double => Some(8),
            ByteArray | String | List | Compound | IntArray => None,
        }
    }
}

/// Header of a tag at compound scope.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NamedTag<'a> {
    pub tag_type: TagType,
    /// Raw name bytes, empty for `End`.
    pub name: &'a [u8],
}

impl<'a> NamedTag<'a> {
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }

    pub fn name_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }
}

/// Open scope left to skip.
enum Frame {
    Compound,
    List { element: TagType, remaining: u32 },
}

/// Lazy walker over a tag stream.
///
/// The decoder never builds a tree. Callers descend with `find_child`, which
/// skips every sibling it passes over, and read leaves with the typed readers
/// once the cursor sits on a payload.
pub struct TagDecoder<'a> {
    cursor: TagCursor<'a>,
}

impl<'a> TagDecoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        TagDecoder {
            cursor: TagCursor::new(buffer),
        }
    }

    pub fn cursor(&self) -> &TagCursor<'a> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut TagCursor<'a> {
        &mut self.cursor
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn read_type(&mut self) -> Result<TagType, TagDecodeError> {
        let position = self.cursor.position();
        let type_id = self.cursor.read_u8()?;

        TagType::from_id(type_id).ok_or(TagDecodeError::UnknownTagType { type_id, position })
    }

    /// Reads a type byte and, unless it is `End`, the name following it.
    pub fn read_named_tag(&mut self) -> Result<NamedTag<'a>, TagDecodeError> {
        let tag_type = self.read_type()?;

        if tag_type == TagType::End {
            return Ok(NamedTag { tag_type, name: &[] });
        }

        let name_length = self.cursor.read_u16()? as usize;
        let name = self.cursor.read_bytes(name_length)?;

        Ok(NamedTag { tag_type, name })
    }

    /// Reads the header of the root tag, leaving the cursor inside its scope.
    pub fn enter_root(&mut self) -> Result<NamedTag<'a>, TagDecodeError> {
        self.read_named_tag()
    }

    /// Scans the current compound for a child called `name`.
    ///
    /// On success the cursor sits on the child's payload and its type is
    /// returned. `None` means the compound's `End` was consumed without a match.
    pub fn find_child(&mut self, name: &str) -> Result<Option<TagType>, TagDecodeError> {
        loop {
            let tag = self.read_named_tag()?;

            if tag.tag_type == TagType::End {
                return Ok(None);
            }

            if tag.is_named(name) {
                return Ok(Some(tag.tag_type));
            }

            self.skip_payload(tag.tag_type)?;
        }
    }

    /// Advances past one payload of `tag_type` without materializing it.
    pub fn skip_payload(&mut self, tag_type: TagType) -> Result<(), TagDecodeError> {
        let mut stack = Vec::new();
        self.skip_value(tag_type, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            let next = match frame {
                Frame::Compound => self.read_named_tag()?.tag_type,
                Frame::List { element, remaining } => {
                    if *remaining == 0 {
                        TagType::End
                    } else {
                        *remaining -= 1;
                        *element
                    }
                }
            };

            if next == TagType::End {
                stack.pop();
            } else {
                self.skip_value(next, &mut stack)?;
            }
        }

        Ok(())
    }

    /// Skips the flat part of a value, opening a frame for lists and
    /// compounds whose contents still need walking.
    fn skip_value(&mut self, tag_type: TagType, stack: &mut Vec<Frame>) -> Result<(), TagDecodeError> {
        if let Some(width) = tag_type.fixed_width() {
            return self.cursor.skip(width);
        }

        match tag_type {
            TagType::ByteArray => {
                let length = self.cursor.read_u32()? as usize;
                self.cursor.skip(length)
            }
            TagType::String => {
                let length = self.cursor.read_u16()? as usize;
                self.cursor.skip(length)
            }
            TagType::IntArray => {
                let count = self.cursor.read_u32()? as usize;
                self.skip_elements(count, 4)
            }
            TagType::List => {
                let (element, count) = self.read_list_header()?;

                match element.fixed_width() {
                    Some(width) => self.skip_elements(count as usize, width),
                    None => push_frame(
                        stack,
                        Frame::List {
                            element,
                            remaining: count,
                        },
                    ),
                }
            }
            _ => push_frame(stack, Frame::Compound),
        }
    }

    fn skip_elements(&mut self, count: usize, width: usize) -> Result<(), TagDecodeError> {
        match count.checked_mul(width) {
            Some(length) => self.cursor.skip(length),
            None => Err(TagDecodeError::OutOfBounds {
                position: self.cursor.position(),
                requested: usize::MAX,
                length: self.cursor.len(),
            }),
        }
    }

    pub fn read_byte(&mut self) -> Result<i8, TagDecodeError> {
        self.cursor.read_i8()
    }

    pub fn read_short(&mut self) -> Result<i16, TagDecodeError> {
        self.cursor.read_i16()
    }

    pub fn read_int(&mut self) -> Result<i32, TagDecodeError> {
        self.cursor.read_i32()
    }

    pub fn read_long(&mut self) -> Result<i64, TagDecodeError> {
        self.cursor.read_i64()
    }

    pub fn read_float(&mut self) -> Result<f32, TagDecodeError> {
        self.cursor.read_f32()
    }

    pub fn read_double(&mut self) -> Result<f64, TagDecodeError> {
        self.cursor.read_f64()
    }

    /// Borrows a byte array payload straight out of the buffer.
    pub fn read_byte_array(&mut self) -> Result<&'a [u8], TagDecodeError> {
        let length = self.cursor.read_u32()? as usize;
        self.cursor.read_bytes(length)
    }

    pub fn read_string(&mut self) -> Result<&'a str, TagDecodeError> {
        let position = self.cursor.position();
        let length = self.cursor.read_u16()? as usize;
        let bytes = self.cursor.read_bytes(length)?;

        std::str::from_utf8(bytes).map_err(|_| TagDecodeError::InvalidString { position })
    }

    /// Reads a list's element type and element count.
    pub fn read_list_header(&mut self) -> Result<(TagType, u32), TagDecodeError> {
        let element = self.read_type()?;
        let count = self.cursor.read_u32()?;

        Ok((element, count))
    }

    pub fn read_int_array(&mut self) -> Result<Vec<i32>, TagDecodeError> {
        let count = self.cursor.read_u32()? as usize;

        if count > self.cursor.remaining() / 4 {
            return Err(TagDecodeError::OutOfBounds {
                position: self.cursor.position(),
                requested: count.saturating_mul(4),
                length: self.cursor.len(),
            });
        }

        (0..count).map(|_| self.cursor.read_i32()).collect()
    }
}

fn push_frame(stack: &mut Vec<Frame>, frame: Frame) -> Result<(), TagDecodeError> {
    if stack.len() >= MAX_DEPTH {
        return Err(TagDecodeError::NestingTooDeep { depth: MAX_DEPTH });
    }

    stack.push(frame);
    Ok(())
}
