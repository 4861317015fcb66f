//! Top level class file decoding.

use crate::attribute::{AttributeRecord, CodeAttribute, read_attributes};
use crate::constant_pool::ConstantPool;
use crate::error::{ClassFormatError, DecodeResult};
use crate::reader::ByteCursor;

pub const MAGIC: u32 = 0xCAFE_BABE;

pub fn is_supported_version(major: u16, minor: u16) -> bool {
    match major {
        45 => true,
        46..=52 => minor == 0,
        _ => false,
    }
}

/// A field or a method. Members are told apart by name and descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeRecord>,
}

impl MemberRecord {
    fn read(cursor: &mut ByteCursor, pool: &ConstantPool) -> DecodeResult<Self> {
        Ok(Self {
            access_flags: cursor.read_u16()?,
            name_index: cursor.read_u16()?,
            descriptor_index: cursor.read_u16()?,
            attributes: read_attributes(cursor, pool)?,
        })
    }

    pub fn name<'a>(&self, pool: &'a ConstantPool) -> DecodeResult<&'a str> {
        pool.resolve_utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, pool: &'a ConstantPool) -> DecodeResult<&'a str> {
        pool.resolve_utf8(self.descriptor_index)
    }

    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|a| match a {
            AttributeRecord::Code(code) => Some(code),
            _ => None,
        })
    }

    pub fn constant_value_index(&self) -> Option<u16> {
        self.attributes.iter().find_map(|a| match a {
            AttributeRecord::ConstantValue { index } => Some(*index),
            _ => None,
        })
    }

    pub fn is_deprecated(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| matches!(a, AttributeRecord::Deprecated))
    }
}

fn read_members(cursor: &mut ByteCursor, pool: &ConstantPool) -> DecodeResult<Vec<MemberRecord>> {
    let count = cursor.read_u16()?;
    (0..count).map(|_| MemberRecord::read(cursor, pool)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    /// 0 only for `java/lang/Object`.
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<MemberRecord>,
    pub methods: Vec<MemberRecord>,
    pub attributes: Vec<AttributeRecord>,
}

impl ClassDescriptor {
    /// Decodes a complete class file. Either every index in the result
    /// resolves against its constant pool, or an error is returned.
    pub fn parse(data: Vec<u8>) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let magic = cursor.read_u32()?;
        if magic != MAGIC {
            return Err(ClassFormatError::BadMagic(magic));
        }

        let minor_version = cursor.read_u16()?;
        let major_version = cursor.read_u16()?;
        if !is_supported_version(major_version, minor_version) {
            return Err(ClassFormatError::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        let constant_pool = ConstantPool::read(&mut cursor)?;
        let access_flags = cursor.read_u16()?;
        let this_class = cursor.read_u16()?;
        let super_class = cursor.read_u16()?;
        let interfaces = cursor.read_u16s()?;
        let fields = read_members(&mut cursor, &constant_pool)?;
        let methods = read_members(&mut cursor, &constant_pool)?;
        let attributes = read_attributes(&mut cursor, &constant_pool)?;

        if !cursor.is_empty() {
            return Err(ClassFormatError::TrailingBytes(cursor.remaining()));
        }

        let class = Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        };
        class.validate()?;
        Ok(class)
    }

    fn validate(&self) -> DecodeResult<()> {
        let pool = &self.constant_pool;
        pool.validate()?;

        pool.resolve_class_name(self.this_class)?;
        if self.super_class != 0 {
            pool.resolve_class_name(self.super_class)?;
        }
        for &interface in &self.interfaces {
            pool.resolve_class_name(interface)?;
        }
        for member in self.fields.iter().chain(&self.methods) {
            member.name(pool)?;
            member.descriptor(pool)?;
            validate_attributes(pool, &member.attributes)?;
        }
        validate_attributes(pool, &self.attributes)
    }

    pub fn class_name(&self) -> DecodeResult<&str> {
        self.constant_pool.resolve_class_name(self.this_class)
    }

    pub fn super_class_name(&self) -> DecodeResult<Option<&str>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.constant_pool
            .resolve_class_name(self.super_class)
            .map(Some)
    }

    pub fn interface_names(&self) -> DecodeResult<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|&i| self.constant_pool.resolve_class_name(i))
            .collect()
    }

    pub fn source_file(&self) -> DecodeResult<Option<&str>> {
        let index = self.attributes.iter().find_map(|a| match a {
            AttributeRecord::SourceFile { index } => Some(*index),
            _ => None,
        });
        index
            .map(|i| self.constant_pool.resolve_utf8(i))
            .transpose()
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MemberRecord> {
        find_member(&self.methods, &self.constant_pool, name, descriptor)
    }

    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&MemberRecord> {
        find_member(&self.fields, &self.constant_pool, name, descriptor)
    }
}

fn find_member<'a>(
    members: &'a [MemberRecord],
    pool: &ConstantPool,
    name: &str,
    descriptor: &str,
) -> Option<&'a MemberRecord> {
    members.iter().find(|m| {
        m.name(pool).is_ok_and(|n| n == name) && m.descriptor(pool).is_ok_and(|d| d == descriptor)
    })
}

fn validate_attributes(pool: &ConstantPool, attributes: &[AttributeRecord]) -> DecodeResult<()> {
    for attribute in attributes {
        match attribute {
            AttributeRecord::Code(code) => {
                for handler in &code.exception_table {
                    if handler.catch_type != 0 {
                        pool.resolve_class_name(handler.catch_type)?;
                    }
                }
                validate_attributes(pool, &code.attributes)?;
            }
            AttributeRecord::ConstantValue { index } => {
                pool.get(*index)?;
            }
            AttributeRecord::SourceFile { index } => {
                pool.resolve_utf8(*index)?;
            }
            AttributeRecord::Exceptions { exception_indices } => {
                for &i in exception_indices {
                    pool.resolve_class_name(i)?;
                }
            }
            AttributeRecord::LocalVariableTable(vars) => {
                for var in vars {
                    pool.resolve_utf8(var.name_index)?;
                    pool.resolve_utf8(var.descriptor_index)?;
                }
            }
            AttributeRecord::Deprecated
            | AttributeRecord::Synthetic
            | AttributeRecord::LineNumberTable(_)
            | AttributeRecord::Unknown { .. } => {}
        }
    }
    Ok(())
}
