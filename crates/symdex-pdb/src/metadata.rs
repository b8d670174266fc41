use std::io::{self, Read};

use crate::error::{PdbError, PdbResult};

/// ECMA-335 metadata root signature ("BSJB", little-endian).
pub const METADATA_SIGNATURE: u32 = 0x424A_5342;

/// Magic prefix of a legacy Windows PDB (MSF 7.00 container).
pub const MSF_MAGIC: &[u8] = b"Microsoft C/C++ MSF 7.00\r\n\x1aDS\0\0\0";

/// Maximum length of the version string, padding included.
const MAX_VERSION_LEN: u32 = 256;
/// Upper bound on stream count; real files carry five or six.
const MAX_STREAMS: u16 = 64;
/// Maximum stream name length including the NUL terminator.
const MAX_STREAM_NAME_LEN: usize = 32;

/// One entry of the metadata root's stream directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream from the start of the metadata root.
    pub offset: u32,
    /// Size of the stream in bytes.
    pub size: u32,
    /// Stream name, e.g. `#Pdb`, `#~`, `#Strings`.
    pub name: String,
}

impl StreamHeader {
    /// Offset one past the last byte of the stream.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }
}

/// The parsed metadata root of a portable PDB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRoot {
    pub major_version: u16,
    pub minor_version: u16,
    /// Version string, e.g. `PDB v1.0`.
    pub version: String,
    pub flags: u16,
    /// Stream directory in on-disk order.
    pub streams: Vec<StreamHeader>,
}

impl MetadataRoot {
    /// Parse the metadata root from the start of `reader`.
    ///
    /// Only the root and its stream directory are read; stream contents are
    /// left untouched.
    pub fn read<R: Read>(reader: &mut R) -> PdbResult<Self> {
        let mut signature = [0u8; 4];
        read_exact(reader, &mut signature, "metadata signature")?;
        let signature_value = u32::from_le_bytes(signature);
        if signature_value != METADATA_SIGNATURE {
            if signature == MSF_MAGIC[..4] {
                let mut rest = [0u8; 28];
                if reader.read_exact(&mut rest).is_ok() && rest[..] == MSF_MAGIC[4..] {
                    return Err(PdbError::LegacyMsf);
                }
            }
            return Err(PdbError::NotPortable {
                found: signature_value,
            });
        }

        let major_version = read_u16(reader, "major version")?;
        let minor_version = read_u16(reader, "minor version")?;
        let _reserved = read_u32(reader, "reserved field")?;

        let version_len = read_u32(reader, "version length")?;
        if version_len > MAX_VERSION_LEN {
            return Err(PdbError::InvalidHeader(format!(
                "version string length {version_len} exceeds {MAX_VERSION_LEN}"
            )));
        }
        let mut version_bytes = vec![0u8; version_len as usize];
        read_exact(reader, &mut version_bytes, "version string")?;
        let version_end = version_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_end]).into_owned();

        let flags = read_u16(reader, "flags")?;
        let stream_count = read_u16(reader, "stream count")?;
        if stream_count > MAX_STREAMS {
            return Err(PdbError::InvalidHeader(format!(
                "stream count {stream_count} exceeds {MAX_STREAMS}"
            )));
        }

        let mut streams = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            let offset = read_u32(reader, "stream offset")?;
            let size = read_u32(reader, "stream size")?;
            let name = read_stream_name(reader)?;
            streams.push(StreamHeader { offset, size, name });
        }

        Ok(Self {
            major_version,
            minor_version,
            version,
            flags,
            streams,
        })
    }

    /// Look up a stream by exact name.
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// Stream names are NUL-terminated ASCII padded to a four-byte boundary.
fn read_stream_name<R: Read>(reader: &mut R) -> PdbResult<String> {
    let mut name = Vec::new();
    loop {
        let mut chunk = [0u8; 4];
        read_exact(reader, &mut chunk, "stream name")?;
        if let Some(nul) = chunk.iter().position(|&b| b == 0) {
            name.extend_from_slice(&chunk[..nul]);
            break;
        }
        name.extend_from_slice(&chunk);
        if name.len() >= MAX_STREAM_NAME_LEN {
            return Err(PdbError::InvalidHeader(format!(
                "stream name longer than {MAX_STREAM_NAME_LEN} bytes"
            )));
        }
    }
    if !name.is_ascii() {
        return Err(PdbError::InvalidHeader("stream name is not ASCII".into()));
    }
    Ok(String::from_utf8_lossy(&name).into_owned())
}

pub(crate) fn read_exact<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> PdbResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => PdbError::Truncated(what),
        _ => PdbError::Io(e),
    })
}

fn read_u16<R: Read>(reader: &mut R, what: &'static str) -> PdbResult<u16> {
    let mut buf = [0u8; 2];
    read_exact(reader, &mut buf, what)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R, what: &'static str) -> PdbResult<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, what)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PortablePdbBuilder;
    use std::io::Cursor;
    use uuid::Uuid;

    fn sample() -> Vec<u8> {
        PortablePdbBuilder::new(Uuid::from_u128(0x1234)).build()
    }

    #[test]
    fn reads_root_and_directory() {
        let bytes = sample();
        let root = MetadataRoot::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(root.major_version, 1);
        assert_eq!(root.minor_version, 1);
        assert_eq!(root.version, "PDB v1.0");
        let names: Vec<&str> = root.streams.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["#Pdb", "#~"]);
        assert!(root.stream("#Pdb").is_some());
        assert!(root.stream("#Blob").is_none());
    }

    #[test]
    fn stream_offsets_fit_inside_file() {
        let bytes = sample();
        let root = MetadataRoot::read(&mut Cursor::new(&bytes)).unwrap();
        for stream in &root.streams {
            assert!(stream.end() <= bytes.len() as u64, "{} out of bounds", stream.name);
        }
    }

    #[test]
    fn rejects_wrong_signature() {
        let err = MetadataRoot::read(&mut Cursor::new(b"MZ\x90\x00rest-of-a-pe-file")).unwrap_err();
        assert!(matches!(err, PdbError::NotPortable { found } if found == 0x0090_5A4D));
    }

    #[test]
    fn detects_legacy_msf() {
        let mut bytes = MSF_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let err = MetadataRoot::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, PdbError::LegacyMsf));
    }

    #[test]
    fn rejects_truncated_directory() {
        let bytes = sample();
        let err = MetadataRoot::read(&mut Cursor::new(&bytes[..30])).unwrap_err();
        assert!(matches!(err, PdbError::Truncated(_)));
    }

    #[test]
    fn rejects_empty_input() {
        let err = MetadataRoot::read(&mut Cursor::new(Vec::<u8>::new())).unwrap_err();
        assert!(matches!(err, PdbError::Truncated("metadata signature")));
    }

    #[test]
    fn rejects_oversized_version_string() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&METADATA_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&4096u32.to_le_bytes());
        let err = MetadataRoot::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, PdbError::InvalidHeader(_)));
    }

    #[test]
    fn rejects_unterminated_stream_name() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&METADATA_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&[1, 0, 1, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"v1\0\0");
        bytes.extend_from_slice(&[0, 0, 1, 0]);
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&[b'A'; 40]);
        let err = MetadataRoot::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, PdbError::InvalidHeader(_)));
    }
}
