//! DDS header structures.
//!
//! The header is read field by field from a 128-byte block with explicit
//! little-endian widths, never by reinterpreting host memory.

use std::fmt;
use std::io::Read;

use bitflags::bitflags;
use ddsdecode_common::{BinaryReader, ReadExt};

use crate::{Error, Result, DDS_MAGIC};

bitflags! {
    /// `dwFlags` of the surface description.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u32 {
        const CAPS = 0x0000_0001;
        const HEIGHT = 0x0000_0002;
        const WIDTH = 0x0000_0004;
        const PITCH = 0x0000_0008;
        const PIXEL_FORMAT = 0x0000_1000;
        const MIPMAP_COUNT = 0x0002_0000;
        const LINEAR_SIZE = 0x0008_0000;
        const DEPTH = 0x0080_0000;

        /// Flags every readable header must carry.
        const REQUIRED = Self::CAPS.bits()
            | Self::HEIGHT.bits()
            | Self::WIDTH.bits()
            | Self::PIXEL_FORMAT.bits();
    }
}

bitflags! {
    /// `dwFlags` of the pixel format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PixelFormatFlags: u32 {
        const ALPHA_PIXELS = 0x0000_0001;
        const FOUR_CC = 0x0000_0004;
        const RGB = 0x0000_0040;
    }
}

bitflags! {
    /// `dwCaps1`: surface capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SurfaceCaps: u32 {
        const COMPLEX = 0x0000_0008;
        const TEXTURE = 0x0000_1000;
        const MIPMAP = 0x0040_0000;
    }
}

bitflags! {
    /// `dwCaps2`: cubemap and volume capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CubemapCaps: u32 {
        const CUBEMAP = 0x0000_0200;
        const POSITIVE_X = 0x0000_0400;
        const NEGATIVE_X = 0x0000_0800;
        const POSITIVE_Y = 0x0000_1000;
        const NEGATIVE_Y = 0x0000_2000;
        const POSITIVE_Z = 0x0000_4000;
        const NEGATIVE_Z = 0x0000_8000;
        const VOLUME = 0x0020_0000;

        const ALL_FACES = Self::POSITIVE_X.bits()
            | Self::NEGATIVE_X.bits()
            | Self::POSITIVE_Y.bits()
            | Self::NEGATIVE_Y.bits()
            | Self::POSITIVE_Z.bits()
            | Self::NEGATIVE_Z.bits();
    }
}

/// Four-character code for compression type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT2 compression (premultiplied DXT3).
    pub const DXT2: Self = Self(*b"DXT2");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT4 compression (premultiplied DXT5).
    pub const DXT4: Self = Self(*b"DXT4");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: PixelFormatFlags,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    fn parse(reader: &mut BinaryReader<'_>) -> ddsdecode_common::Result<Self> {
        Ok(Self {
            size: reader.read_u32()?,
            flags: PixelFormatFlags::from_bits_retain(reader.read_u32()?),
            four_cc: FourCC(reader.read_array()?),
            rgb_bit_count: reader.read_u32()?,
            r_bit_mask: reader.read_u32()?,
            g_bit_mask: reader.read_u32()?,
            b_bit_mask: reader.read_u32()?,
            a_bit_mask: reader.read_u32()?,
        })
    }
}

/// Surface capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsCaps {
    /// Surface capabilities.
    pub caps1: SurfaceCaps,
    /// Cubemap and volume capabilities.
    pub caps2: CubemapCaps,
    /// Reserved (`dwCaps3`).
    pub caps3: u32,
    /// Reserved (`dwCaps4`).
    pub caps4: u32,
}

impl DdsCaps {
    fn parse(reader: &mut BinaryReader<'_>) -> ddsdecode_common::Result<Self> {
        Ok(Self {
            caps1: SurfaceCaps::from_bits_retain(reader.read_u32()?),
            caps2: CubemapCaps::from_bits_retain(reader.read_u32()?),
            caps3: reader.read_u32()?,
            caps4: reader.read_u32()?,
        })
    }
}

/// DDS file header, magic included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    /// File magic (should be `"DDS "`).
    pub magic: [u8; 4],
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: HeaderFlags,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size. Not checked against the surface size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: DdsCaps,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected value of the `size` field.
    pub const SIZE: u32 = 124;

    /// Bytes occupied on the wire, magic included.
    pub const LEN: usize = 128;

    /// Read the header from the start of a stream without validating it.
    ///
    /// Exactly [`DdsHeader::LEN`] bytes are consumed. Use
    /// [`DdsHeader::validate`] to check the result.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let bytes: [u8; Self::LEN] = reader.read_chunk()?;
        Self::parse(&bytes)
    }

    /// Parse a header from the first [`DdsHeader::LEN`] bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let reader = &mut reader;
        Ok(Self {
            magic: reader.read_array()?,
            size: reader.read_u32()?,
            flags: HeaderFlags::from_bits_retain(reader.read_u32()?),
            height: reader.read_u32()?,
            width: reader.read_u32()?,
            pitch_or_linear_size: reader.read_u32()?,
            depth: reader.read_u32()?,
            mipmap_count: reader.read_u32()?,
            reserved1: reader.read_u32_array()?,
            pixel_format: DdsPixelFormat::parse(reader)?,
            caps: DdsCaps::parse(reader)?,
            reserved2: reader.read_u32()?,
        })
    }

    /// Check the header against the fields every readable DDS must carry.
    ///
    /// Checks run in wire order and the first failure is returned.
    pub fn validate(&self) -> Result<()> {
        if &self.magic != DDS_MAGIC {
            return Err(Error::InvalidMagic(self.magic));
        }
        if self.size != Self::SIZE {
            return Err(Error::InvalidHeaderSize(self.size));
        }
        if !self.flags.contains(HeaderFlags::REQUIRED) {
            return Err(Error::InvalidFlags(self.flags.bits()));
        }
        if self.pixel_format.size != DdsPixelFormat::SIZE {
            return Err(Error::InvalidPixelFormatSize(self.pixel_format.size));
        }
        if !self
            .pixel_format
            .flags
            .intersects(PixelFormatFlags::FOUR_CC | PixelFormatFlags::RGB)
        {
            return Err(Error::InvalidPixelFormatFlags(self.pixel_format.flags.bits()));
        }
        if !self.caps.caps1.contains(SurfaceCaps::TEXTURE) {
            return Err(Error::InvalidCapabilities(self.caps.caps1.bits()));
        }
        Ok(())
    }

    /// Whether the pixel data is block compressed.
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.pixel_format.flags.contains(PixelFormatFlags::FOUR_CC)
    }

    /// Whether the pixel data carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.pixel_format.flags.contains(PixelFormatFlags::ALPHA_PIXELS)
    }

    /// Whether more than the base mip level follows each face.
    #[inline]
    pub fn has_mipmaps(&self) -> bool {
        self.caps.caps1.contains(SurfaceCaps::MIPMAP) && self.mipmap_count > 1
    }

    /// Whether the cubemap capability is set.
    #[inline]
    pub fn is_cubemap(&self) -> bool {
        self.caps.caps2.contains(CubemapCaps::CUBEMAP)
    }
}
