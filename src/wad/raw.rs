//! # WAD container
//!
//! * Reads the whole archive into RAM (`IWAD` or `PWAD`).
//! * Provides zero-copy access to individual lumps.
//! * Decodes binary lumps into typed vectors with **bincode 2**.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    mem,
    path::Path,
};
use thiserror::Error;

/// One entry in the lump directory (16 bytes on disk).
#[derive(Clone, Debug)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

/// Entire WAD in memory (raw bytes + parsed directory).
#[derive(Debug)]
pub struct Wad {
    lumps: Vec<LumpInfo>,
    bytes: Vec<u8>,
    by_name: HashMap<String, usize>,
}

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is neither an IWAD nor a PWAD")]
    BadMagic,

    #[error("directory extends beyond end of file")]
    DirectoryOutOfBounds,

    #[error("lump index {0} out of range")]
    BadIndex(usize),

    #[error("lump {name} (# {index}) slice {offset}+{size} past EOF ({file_size})")]
    BadOffset {
        index: usize,
        name: String,
        offset: u32,
        size: u32,
        file_size: usize,
    },

    #[error("lump {name} (# {index}) size {size} not multiple of element {elem_size}")]
    BadLumpSize {
        index: usize,
        name: String,
        size: usize,
        elem_size: usize,
    },

    #[error("lump {name} (# {index}) element {elem}: {source}")]
    BadElement {
        index: usize,
        name: String,
        elem: usize,
        source: bincode::error::DecodeError,
    },
}

impl Wad {
    // ------------------------------------------------------------------ //
    // Low-level helpers
    // ------------------------------------------------------------------ //

    /// Expose directory as a read-only slice
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.lumps
    }

    /// Return &str view of an 8-byte lump name (trimmed at first NUL).
    pub fn lump_name_str(name: &[u8; 8]) -> &str {
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        std::str::from_utf8(&name[..end]).unwrap_or("?")
    }

    /// Name of lump `idx`, if it exists.
    pub fn name_at(&self, idx: usize) -> Option<&str> {
        self.lumps.get(idx).map(|l| Self::lump_name_str(&l.name))
    }

    /// Raw bytes of lump `idx` (slice into `self.bytes`).
    pub fn lump_bytes(&self, idx: usize) -> Result<&[u8], WadError> {
        let l = self.lumps.get(idx).ok_or(WadError::BadIndex(idx))?;
        let start = l.offset as usize;
        let end = start + l.size as usize;
        Ok(&self.bytes[start..end])
    }

    /// Find the last lump with `name` (case-sensitive like vanilla Doom).
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    // ------------------------------------------------------------------ //
    // Generic decode helper
    // ------------------------------------------------------------------ //

    /// Decode lump `idx` as a packed array of `T`. Empty lumps give an
    /// empty vector.
    pub fn lump_to_vec<T>(&self, idx: usize) -> Result<Vec<T>, WadError>
    where
        T: Decode<()>,
    {
        let bytes = self.lump_bytes(idx)?;
        let elem = mem::size_of::<T>();
        let name = || Self::lump_name_str(&self.lumps[idx].name).to_owned();

        if bytes.len() % elem != 0 {
            return Err(WadError::BadLumpSize {
                index: idx,
                name: name(),
                size: bytes.len(),
                elem_size: elem,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        bytes
            .chunks_exact(elem)
            .enumerate()
            .map(|(i, chunk)| {
                decode_from_slice::<T, _>(chunk, cfg)
                    .map(|(val, _)| val)
                    .map_err(|e| WadError::BadElement {
                        index: idx,
                        name: name(),
                        elem: i,
                        source: e,
                    })
            })
            .collect()
    }

    // ------------------------------------------------------------------ //
    // Loading
    // ------------------------------------------------------------------ //

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WadError> {
        let mut header = bytes.as_slice();

        let mut magic = [0u8; 4];
        header.read_exact(&mut magic)?;
        if &magic != b"IWAD" && &magic != b"PWAD" {
            return Err(WadError::BadMagic);
        }

        let num_lumps = header.read_u32::<LE>()? as usize;
        let dir_offset = header.read_u32::<LE>()? as usize;

        // directory bounds check
        let dir_end = dir_offset + num_lumps * 16;
        if dir_end > bytes.len() {
            return Err(WadError::DirectoryOutOfBounds);
        }

        // parse directory
        let mut lumps = Vec::with_capacity(num_lumps);
        let mut cur = &bytes[dir_offset..dir_end];
        for _ in 0..num_lumps {
            let offset = cur.read_u32::<LE>()?;
            let size = cur.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            cur.read_exact(&mut name)?;
            lumps.push(LumpInfo { name, offset, size });
        }

        // validate each lump slice
        for (i, l) in lumps.iter().enumerate() {
            let end = l.offset as usize + l.size as usize;
            if end > bytes.len() {
                return Err(WadError::BadOffset {
                    index: i,
                    name: Self::lump_name_str(&l.name).into(),
                    offset: l.offset,
                    size: l.size,
                    file_size: bytes.len(),
                });
            }
        }

        // build name → idx map (later lumps shadow earlier ones)
        let mut by_name = HashMap::with_capacity(lumps.len());
        for (i, l) in lumps.iter().enumerate().rev() {
            by_name
                .entry(Self::lump_name_str(&l.name).to_owned())
                .or_insert(i);
        }

        Ok(Self {
            lumps,
            bytes,
            by_name,
        })
    }
}

// ==========================================================================
// Tests
// ==========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    /// Assemble a PWAD from `(name, bytes)` pairs.
    pub(crate) fn build_wad(lumps: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut data = Vec::new();
        let mut dir = Vec::new();
        let mut offset = 12u32;
        for (name, bytes) in lumps {
            let mut n = [0u8; 8];
            n[..name.len()].copy_from_slice(name.as_bytes());
            dir.write_u32::<LE>(offset).unwrap();
            dir.write_u32::<LE>(bytes.len() as u32).unwrap();
            dir.extend_from_slice(&n);
            data.extend_from_slice(bytes);
            offset += bytes.len() as u32;
        }
        let mut out = Vec::new();
        out.extend_from_slice(b"PWAD");
        out.write_u32::<LE>(lumps.len() as u32).unwrap();
        out.write_u32::<LE>(offset).unwrap();
        out.extend(data);
        out.extend(dir);
        out
    }

    #[test]
    fn opens_pwad_and_shadows_names() {
        let bytes = build_wad(&[
            ("FOO", vec![1, 2]),
            ("BAR", vec![]),
            ("FOO", vec![3, 4, 5]),
        ]);
        let wad = Wad::from_bytes(bytes).unwrap();
        assert_eq!(wad.lumps().len(), 3);
        assert_eq!(wad.find_lump("FOO"), Some(2));
        assert_eq!(wad.lump_bytes(2).unwrap(), &[3, 4, 5]);
        assert_eq!(wad.name_at(1), Some("BAR"));
        assert!(matches!(wad.lump_bytes(7), Err(WadError::BadIndex(7))));
    }

    #[test]
    fn rejects_bad_headers() {
        let mut bytes = build_wad(&[("FOO", vec![1])]);
        bytes[0] = b'X';
        assert!(matches!(Wad::from_bytes(bytes), Err(WadError::BadMagic)));

        let mut bytes = build_wad(&[("FOO", vec![1])]);
        bytes[4] = 9; // nine lumps claimed
        assert!(matches!(
            Wad::from_bytes(bytes),
            Err(WadError::DirectoryOutOfBounds)
        ));

        assert!(matches!(Wad::from_bytes(vec![b'P']), Err(WadError::Io(_))));
    }

    #[test]
    fn lump_to_vec_decodes_and_checks_size() {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq, bincode::Decode)]
        struct Foo {
            a: i16,
            b: i16,
        }

        let foo = [1i16, 2, 3, -4]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<_>>();
        let wad = Wad::from_bytes(build_wad(&[
            ("FOO", foo),
            ("ODD", vec![0; 5]),
            ("NONE", vec![]),
        ]))
        .unwrap();

        let v: Vec<Foo> = wad.lump_to_vec(0).unwrap();
        assert_eq!(v, vec![Foo { a: 1, b: 2 }, Foo { a: 3, b: -4 }]);
        assert!(matches!(
            wad.lump_to_vec::<Foo>(1),
            Err(WadError::BadLumpSize { elem_size: 4, .. })
        ));
        assert!(wad.lump_to_vec::<Foo>(2).unwrap().is_empty());
    }
}
