//! Skipping mip levels below the base image.

use std::io::Read;

use ddsdecode_common::ReadExt;
use tracing::trace;

use crate::format::SurfaceInfo;
use crate::Result;

/// Consume mip levels `1..mipmap_count` of one face without decoding them.
///
/// Does nothing unless the surface declares mipmaps.
pub fn skip_mipmaps<R: Read + ?Sized>(reader: &mut R, info: &SurfaceInfo) -> Result<()> {
    if !info.has_mipmap {
        return Ok(());
    }
    for level in 1..info.mipmap_count {
        let len = info.mip_level_size(level);
        trace!(level, len, "skipping mip level");
        reader.skip_exact(len)?;
    }
    Ok(())
}
