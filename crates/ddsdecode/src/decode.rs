//! DDS decoding to RGBA.

use std::io::Read;

use tracing::debug;

use crate::bc::{self, DecodedBlock, BLOCK_DIM, DECODED_BLOCK_LEN};
use crate::format::{DxtVariant, SurfaceInfo};
use crate::header::DdsHeader;
use crate::mipmap::skip_mipmaps;
use crate::uncompressed;
use crate::Result;

/// A decoded DDS texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// The header as read from the stream.
    pub header: DdsHeader,
    /// Width in texels, as declared by the header.
    pub width: u32,
    /// Height in texels of a single face, as declared by the header.
    pub height: u32,
    /// 0 for uncompressed data, 1-5 for DXT1-DXT5.
    pub dxt: u8,
    /// Number of faces stacked in `data`: 6 for cubemaps, otherwise 1.
    pub faces: u32,
    /// RGBA texels, row-major, faces concatenated vertically.
    pub data: Vec<u8>,
}

impl Texture {
    /// Decode a texture from a stream positioned at the `"DDS "` magic.
    pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        decode(reader)
    }

    /// The compression variant, if any.
    pub fn variant(&self) -> Option<DxtVariant> {
        match self.dxt {
            1 => Some(DxtVariant::Dxt1),
            2 => Some(DxtVariant::Dxt2),
            3 => Some(DxtVariant::Dxt3),
            4 => Some(DxtVariant::Dxt4),
            5 => Some(DxtVariant::Dxt5),
            _ => None,
        }
    }

    /// Number of faces in the texture.
    #[inline]
    pub fn face_count(&self) -> u32 {
        self.faces
    }

    /// RGBA data of a single face.
    pub fn face(&self, index: u32) -> Option<&[u8]> {
        if index >= self.faces {
            return None;
        }
        let len = self.data.len() / self.faces as usize;
        let start = index as usize * len;
        self.data.get(start..start + len)
    }

    /// Consume the texture, returning the pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Decode a DDS stream into an RGBA [`Texture`].
///
/// Reads the header, validates it, then decodes the base level of every
/// face. Lower mip levels are read and discarded.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
///
/// let mut file = BufReader::new(File::open("texture.dds")?);
/// let texture = ddsdecode::decode(&mut file)?;
/// println!("{}x{} DXT{}", texture.width, texture.height, texture.dxt);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Texture> {
    let header = DdsHeader::read(reader)?;
    header.validate()?;
    let info = SurfaceInfo::from_header(&header)?;

    debug!(
        width = info.width,
        height = info.height,
        dxt = info.dxt_family(),
        faces = info.cubemap_faces,
        mipmaps = info.mipmap_count,
        "decoding DDS surface"
    );

    let mut data = alloc_output(&info)?;
    match info.variant {
        Some(variant) => decode_compressed(reader, &info, variant, &mut data)?,
        None => decode_uncompressed(reader, &info, &mut data)?,
    }

    Ok(Texture {
        header,
        width: header.width,
        height: header.height,
        dxt: info.dxt_family(),
        faces: info.cubemap_faces,
        data,
    })
}

/// Zeroed output buffer for every face, or `ImageTooLarge` if the
/// allocator refuses it.
fn alloc_output(info: &SurfaceInfo) -> Result<Vec<u8>> {
    let len = info.total_len()?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| info.too_large())?;
    data.resize(len, 0);
    Ok(data)
}

fn decode_compressed<R: Read + ?Sized>(
    reader: &mut R,
    info: &SurfaceInfo,
    variant: DxtVariant,
    data: &mut [u8],
) -> Result<()> {
    let width = info.width as usize;
    let height = info.height as usize;
    let block_pitch = info.block_pitch as u64;
    let mut block: DecodedBlock = [0; DECODED_BLOCK_LEN];

    for face in 0..info.cubemap_faces as usize {
        for i in 0..info.num_blocks {
            let ref_x = BLOCK_DIM * (i % block_pitch) as usize;
            let ref_y = BLOCK_DIM * (i / block_pitch) as usize;

            // Index bits span the whole block, so decode before clipping.
            bc::read_block(variant, reader, &mut block)?;

            let bw = BLOCK_DIM.min(width - ref_x);
            let bh = BLOCK_DIM.min(height - ref_y);
            for by in 0..bh {
                let dst = 4 * ((ref_y + by + face * width) * width + ref_x);
                let src = by * BLOCK_DIM * 4;
                data[dst..dst + bw * 4].copy_from_slice(&block[src..src + bw * 4]);
            }
        }
        skip_mipmaps(reader, info)?;
    }
    Ok(())
}

fn decode_uncompressed<R: Read + ?Sized>(
    reader: &mut R,
    info: &SurfaceInfo,
    data: &mut [u8],
) -> Result<()> {
    let face_len = info.face_len()?;
    if face_len == 0 {
        // Degenerate surface; mip levels still occupy the stream.
        for _ in 0..info.cubemap_faces {
            skip_mipmaps(reader, info)?;
        }
        return Ok(());
    }
    for face in data.chunks_exact_mut(face_len) {
        uncompressed::read_face(reader, info, face)?;
        skip_mipmaps(reader, info)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::{dxt_header, header_bytes, rgb_header};
    use crate::header::{CubemapCaps, FourCC, SurfaceCaps};
    use crate::Error;

    const RED: [u8; 2] = [0x00, 0xF8];
    const BLUE: [u8; 2] = [0x1F, 0x00];

    fn stream(header: &DdsHeader, body: &[u8]) -> Vec<u8> {
        let mut bytes = header_bytes(header);
        bytes.extend_from_slice(body);
        bytes
    }

    fn dxt1_block(c0: [u8; 2], c1: [u8; 2], indices: [u8; 4]) -> Vec<u8> {
        [&c0[..], &c1[..], &indices[..]].concat()
    }

    #[test]
    fn test_decode_single_dxt1_block() {
        let header = dxt_header(FourCC::DXT1, 4, 4);
        let bytes = stream(&header, &dxt1_block(RED, BLUE, [0xE4; 4]));

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.width, 4);
        assert_eq!(texture.height, 4);
        assert_eq!(texture.dxt, 1);
        assert_eq!(texture.variant(), Some(DxtVariant::Dxt1));
        assert_eq!(texture.data.len(), 64);

        let palette: [[u8; 4]; 4] = [
            [255, 0, 0, 255],
            [0, 0, 255, 255],
            [170, 0, 85, 255],
            [85, 0, 170, 255],
        ];
        let expected: Vec<u8> = (0..16).flat_map(|i| palette[i % 4]).collect();
        assert_eq!(texture.data, expected);
    }

    #[test]
    fn test_partial_blocks_are_clipped() {
        // 6x5 needs a 2x2 grid of blocks; block 1 is all blue, the rest red.
        let header = dxt_header(FourCC::DXT1, 6, 5);
        let mut body = Vec::new();
        for i in 0..4 {
            let color = if i == 1 { BLUE } else { RED };
            body.extend(dxt1_block(color, [0, 0], [0; 4]));
        }
        let bytes = stream(&header, &body);

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.data.len(), 6 * 5 * 4);
        for y in 0..5 {
            for x in 0..6 {
                let texel = &texture.data[4 * (y * 6 + x)..][..4];
                let expected: [u8; 4] = if x >= 4 && y < 4 {
                    [0, 0, 255, 255]
                } else {
                    [255, 0, 0, 255]
                };
                assert_eq!(texel, &expected, "texel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_cubemap_faces_stack_vertically() {
        let mut header = dxt_header(FourCC::DXT5, 4, 4);
        header.caps.caps1 |= SurfaceCaps::COMPLEX;
        header.caps.caps2 = CubemapCaps::CUBEMAP | CubemapCaps::ALL_FACES;

        let mut body = Vec::new();
        for face in 0..6u8 {
            // Constant alpha equal to the face index, white color.
            body.extend([face, face, 0, 0, 0, 0, 0, 0]);
            body.extend(dxt1_block([0xFF, 0xFF], [0, 0], [0; 4]));
        }
        let bytes = stream(&header, &body);

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.face_count(), 6);
        assert_eq!(texture.data.len(), 6 * 64);
        for face in 0..6u32 {
            let data = texture.face(face).unwrap();
            assert!(data.chunks_exact(4).all(|t| t == [255, 255, 255, face as u8]));
        }
        assert!(texture.face(6).is_none());
    }

    #[test]
    fn test_non_square_cubemap_is_single_face() {
        let mut header = dxt_header(FourCC::DXT1, 8, 4);
        header.caps.caps2 = CubemapCaps::CUBEMAP | CubemapCaps::ALL_FACES;
        let bytes = stream(&header, &[0u8; 16]);

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.faces, 1);
        assert_eq!(texture.data.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_mip_levels_are_skipped_per_face() {
        let mut header = dxt_header(FourCC::DXT1, 8, 8);
        header.caps.caps1 |= SurfaceCaps::MIPMAP;
        header.mipmap_count = 3;

        // Base: 4 red blocks. Levels 1 and 2: 8 bytes each of garbage.
        let mut body = Vec::new();
        for _ in 0..4 {
            body.extend(dxt1_block(RED, [0, 0], [0; 4]));
        }
        body.extend([0xAB; 16]);
        let bytes = stream(&header, &body);

        let mut cursor = bytes.as_slice();
        let texture = decode(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        assert!(texture.data.chunks_exact(4).all(|t| t == [255, 0, 0, 255]));
    }

    #[test]
    fn test_uncompressed_bgr() {
        let header = rgb_header(2, 1, false);
        let bytes = stream(&header, &[10, 20, 30, 1, 2, 3]);

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.dxt, 0);
        assert_eq!(texture.variant(), None);
        assert_eq!(texture.data, vec![30, 20, 10, 255, 3, 2, 1, 255]);
    }

    #[test]
    fn test_uncompressed_cubemap_with_mipmaps() {
        let mut header = rgb_header(2, 2, true);
        header.caps.caps1 |= SurfaceCaps::MIPMAP | SurfaceCaps::COMPLEX;
        header.caps.caps2 = CubemapCaps::CUBEMAP | CubemapCaps::ALL_FACES;
        header.mipmap_count = 2;

        let mut body = Vec::new();
        for face in 0..6u8 {
            for _ in 0..4 {
                body.extend([face, 0, 100, 200]);
            }
            // Level 1: one BGRA texel.
            body.extend([9, 9, 9, 9]);
        }
        let bytes = stream(&header, &body);

        let texture = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(texture.data.len(), 6 * 16);
        for face in 0..6u32 {
            let data = texture.face(face).unwrap();
            assert!(data.chunks_exact(4).all(|t| t == [100, 0, face as u8, 200]));
        }
    }

    #[test]
    fn test_invalid_magic_reads_only_header() {
        let mut header = dxt_header(FourCC::DXT1, 4, 4);
        header.magic = *b"DDX ";
        let bytes = stream(&header, &[0u8; 8]);

        let mut cursor = bytes.as_slice();
        assert!(matches!(decode(&mut cursor), Err(Error::InvalidMagic(m)) if &m == b"DDX "));
        assert_eq!(cursor.len(), 8);
    }

    #[test]
    fn test_oversized_surface_is_an_error() {
        let mut header = dxt_header(FourCC::DXT1, 1 << 24, 1 << 24);
        header.caps.caps2 = CubemapCaps::CUBEMAP | CubemapCaps::ALL_FACES;
        let bytes = stream(&header, &[0u8; 8]);

        assert!(matches!(
            decode(&mut bytes.as_slice()),
            Err(Error::ImageTooLarge { faces: 6, .. })
        ));
    }

    #[test]
    fn test_dxt2_decodes_like_dxt3() {
        let mut body = vec![0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE];
        body.extend(dxt1_block(RED, BLUE, [0x1B; 4]));

        let dxt3 = decode(&mut stream(&dxt_header(FourCC::DXT3, 4, 4), &body).as_slice()).unwrap();
        let dxt2 = decode(&mut stream(&dxt_header(FourCC::DXT2, 4, 4), &body).as_slice()).unwrap();
        assert_eq!(dxt2.dxt, 2);
        assert_eq!(dxt2.variant(), Some(DxtVariant::Dxt2));
        assert_eq!(dxt2.data, dxt3.data);
    }

    #[test]
    fn test_dxt4_decodes_like_dxt5() {
        let mut body = vec![200, 40, 0x88, 0xC6, 0xFA, 0x05, 0x39, 0x77];
        body.extend(dxt1_block(BLUE, RED, [0xE4; 4]));

        let dxt5 = decode(&mut stream(&dxt_header(FourCC::DXT5, 4, 4), &body).as_slice()).unwrap();
        let dxt4 = decode(&mut stream(&dxt_header(FourCC::DXT4, 4, 4), &body).as_slice()).unwrap();
        assert_eq!(dxt4.dxt, 4);
        assert_eq!(dxt4.variant(), Some(DxtVariant::Dxt4));
        assert_eq!(dxt4.data, dxt5.data);
    }

    #[test]
    fn test_unsupported_variant() {
        let header = dxt_header(FourCC(*b"DXT9"), 4, 4);
        let bytes = stream(&header, &[0u8; 16]);
        assert!(matches!(
            decode(&mut bytes.as_slice()),
            Err(Error::UnsupportedDxtVariant(FourCC(code))) if &code == b"DXT9"
        ));
    }

    #[test]
    fn test_truncated_block_data() {
        let header = dxt_header(FourCC::DXT3, 8, 4);
        let bytes = stream(&header, &[0u8; 20]);
        assert!(matches!(
            decode(&mut bytes.as_slice()),
            Err(Error::TruncatedStream { needed: 8, available: 4 })
        ));
    }
}
