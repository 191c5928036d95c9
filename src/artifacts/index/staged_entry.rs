use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;

/// Size of a binary blob id
const OID_SIZE: usize = 20;

/// Size of the path length prefix
const PATH_LENGTH_SIZE: usize = 2;

/// A path staged for addition together with the blob holding its content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedAddition {
    pub path: String,
    pub oid: ObjectId,
}

impl StagedAddition {
    pub(crate) fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::new();
        self.oid.write_h40_to(&mut bytes)?;
        write_path(&mut bytes, &self.path)?;

        Ok(Bytes::from(bytes))
    }

    pub(crate) fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let oid_bytes = reader.read(OID_SIZE)?;
        let oid = ObjectId::read_h40_from(&mut &oid_bytes[..])?;
        let path = read_path(reader)?;

        Ok(StagedAddition::new(path, oid))
    }
}

/// Serialize a staged removal (just the path)
pub(crate) fn serialize_removal(path: &str) -> anyhow::Result<Bytes> {
    let mut bytes = Vec::new();
    write_path(&mut bytes, path)?;

    Ok(Bytes::from(bytes))
}

pub(crate) fn read_removal(reader: &mut Checksum) -> anyhow::Result<String> {
    read_path(reader)
}

fn write_path(bytes: &mut Vec<u8>, path: &str) -> anyhow::Result<()> {
    let length = u16::try_from(path.len())
        .with_context(|| format!("path too long to stage: {path}"))?;
    bytes.write_u16::<byteorder::NetworkEndian>(length)?;
    bytes.extend_from_slice(path.as_bytes());

    Ok(())
}

fn read_path(reader: &mut Checksum) -> anyhow::Result<String> {
    let length_bytes = reader.read(PATH_LENGTH_SIZE)?;
    let length = byteorder::NetworkEndian::read_u16(&length_bytes) as usize;
    let path_bytes = reader.read(length)?;

    String::from_utf8(path_bytes.to_vec()).context("staged path is not valid UTF-8")
}
