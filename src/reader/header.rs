use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;

use super::error::{ReadContext, ReaderError, Stage};
use super::source::CountingReader;
use crate::format::{
    FileHeader, FormatVariant, FORMAT_VERSION, LAYOUT_END, MAGIC, MAX_GENERATOR_LEN,
    MAX_LAYOUT_ENTRIES,
};
use crate::layout::RecordLayout;
use crate::quantity::Quantity;

fn bad_header(offset: u64, reason: impl Into<String>) -> ReaderError {
    ReaderError::BadHeader {
        offset,
        reason: reason.into(),
    }
}

/// Parse the file header and build the full record layout it declares
pub(super) fn read_header<R: Read>(
    input: &mut CountingReader<R>,
) -> Result<FileHeader, ReaderError> {
    let start = input.position();

    let mut magic = [0u8; 4];
    input.read_exact(&mut magic).at(Stage::Header, start)?;
    if &magic != MAGIC {
        return Err(bad_header(start, format!("bad magic {:?}", magic)));
    }

    let offset = input.position();
    let format_version = input.read_u16::<LittleEndian>().at(Stage::Header, offset)?;
    if format_version != FORMAT_VERSION {
        return Err(bad_header(
            offset,
            format!(
                "unsupported format version {} (expected {})",
                format_version, FORMAT_VERSION
            ),
        ));
    }
    let variant =
        FormatVariant::from_u16(input.read_u16::<LittleEndian>().at(Stage::Header, offset)?);

    let offset = input.position();
    let generator_len = input.read_u32::<LittleEndian>().at(Stage::Header, offset)? as usize;
    if generator_len > MAX_GENERATOR_LEN {
        return Err(bad_header(
            offset,
            format!("generator string of {} bytes is too long", generator_len),
        ));
    }
    let mut generator = vec![0u8; generator_len];
    input.read_exact(&mut generator).at(Stage::Header, offset)?;
    let generator = String::from_utf8(generator)
        .map_err(|_| bad_header(offset, "generator string is not valid UTF-8"))?;

    let offset = input.position();
    let stride = input.read_u32::<LittleEndian>().at(Stage::Header, offset)? as usize;

    let mut pairs = Vec::new();
    let mut unknown_tags = Vec::new();
    loop {
        let offset = input.position();
        let tag = input.read_u32::<LittleEndian>().at(Stage::Header, offset)?;
        if tag == LAYOUT_END {
            break;
        }
        if pairs.len() + unknown_tags.len() >= MAX_LAYOUT_ENTRIES {
            return Err(bad_header(
                offset,
                format!("layout table exceeds {} entries", MAX_LAYOUT_ENTRIES),
            ));
        }
        let field_offset = input.read_u32::<LittleEndian>().at(Stage::Header, offset)? as usize;
        match Quantity::from_tag(tag) {
            Some(quantity) => pairs.push((quantity, field_offset)),
            None => {
                debug!("Skipping unknown quantity tag {} at offset {}", tag, field_offset);
                unknown_tags.push(tag);
            }
        }
    }

    let layout = RecordLayout::new(stride, pairs)?;
    debug!(
        "Stream header: version {}, variant {}, generator '{}', stride {} bytes, {} quantities",
        format_version,
        variant,
        generator,
        layout.stride(),
        layout.len()
    );

    Ok(FileHeader {
        format_version,
        variant,
        generator,
        layout,
        unknown_tags,
    })
}
