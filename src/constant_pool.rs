//! The constant pool: a 1-indexed table of tagged constants.
//!
//! Reference constants only store indices. Anything that needs the referenced
//! value asks the pool, so the pool has to be read completely before the
//! first lookup.

use cesu8::from_java_cesu8;

use crate::error::{ClassFormatError, DecodeResult};
use crate::reader::ByteCursor;

pub mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELDREF: u8 = 9;
    pub const METHODREF: u8 = 10;
    pub const INTERFACE_METHODREF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const INVOKE_DYNAMIC: u8 = 18;
}

/// Payload shared by `Fieldref`, `Methodref` and `InterfaceMethodref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantEntry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String {
        string_index: u16,
    },
    Class {
        name_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    Fieldref(MemberRef),
    Methodref(MemberRef),
    InterfaceMethodref(MemberRef),
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    MethodType {
        descriptor_index: u16,
    },
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
}

impl ConstantEntry {
    fn read(cursor: &mut ByteCursor, index: u16) -> DecodeResult<Self> {
        let tag = cursor.read_u8()?;
        let entry = match tag {
            tag::UTF8 => {
                let len = cursor.read_u16()? as usize;
                let bytes = cursor.read_bytes(len)?;
                // Modified UTF-8: two byte NUL, supplementary characters as surrogate pairs.
                let s = from_java_cesu8(&bytes).map_err(|_| ClassFormatError::InvalidUtf8 { index })?;
                ConstantEntry::Utf8(s.into_owned())
            }
            tag::INTEGER => ConstantEntry::Integer(cursor.read_u32()? as i32),
            tag::FLOAT => ConstantEntry::Float(f32::from_bits(cursor.read_u32()?)),
            tag::LONG => ConstantEntry::Long(cursor.read_u64()? as i64),
            tag::DOUBLE => ConstantEntry::Double(f64::from_bits(cursor.read_u64()?)),
            tag::CLASS => ConstantEntry::Class {
                name_index: cursor.read_u16()?,
            },
            tag::STRING => ConstantEntry::String {
                string_index: cursor.read_u16()?,
            },
            tag::FIELDREF => ConstantEntry::Fieldref(read_member_ref(cursor)?),
            tag::METHODREF => ConstantEntry::Methodref(read_member_ref(cursor)?),
            tag::INTERFACE_METHODREF => ConstantEntry::InterfaceMethodref(read_member_ref(cursor)?),
            tag::NAME_AND_TYPE => ConstantEntry::NameAndType {
                name_index: cursor.read_u16()?,
                descriptor_index: cursor.read_u16()?,
            },
            tag::METHOD_HANDLE => ConstantEntry::MethodHandle {
                reference_kind: cursor.read_u8()?,
                reference_index: cursor.read_u16()?,
            },
            tag::METHOD_TYPE => ConstantEntry::MethodType {
                descriptor_index: cursor.read_u16()?,
            },
            tag::INVOKE_DYNAMIC => ConstantEntry::InvokeDynamic {
                bootstrap_method_attr_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            tag => return Err(ClassFormatError::UnknownConstantTag { tag, index }),
        };
        Ok(entry)
    }

    pub fn tag(&self) -> u8 {
        match self {
            ConstantEntry::Utf8(_) => tag::UTF8,
            ConstantEntry::Integer(_) => tag::INTEGER,
            ConstantEntry::Float(_) => tag::FLOAT,
            ConstantEntry::Long(_) => tag::LONG,
            ConstantEntry::Double(_) => tag::DOUBLE,
            ConstantEntry::String { .. } => tag::STRING,
            ConstantEntry::Class { .. } => tag::CLASS,
            ConstantEntry::NameAndType { .. } => tag::NAME_AND_TYPE,
            ConstantEntry::Fieldref(_) => tag::FIELDREF,
            ConstantEntry::Methodref(_) => tag::METHODREF,
            ConstantEntry::InterfaceMethodref(_) => tag::INTERFACE_METHODREF,
            ConstantEntry::MethodHandle { .. } => tag::METHOD_HANDLE,
            ConstantEntry::MethodType { .. } => tag::METHOD_TYPE,
            ConstantEntry::InvokeDynamic { .. } => tag::INVOKE_DYNAMIC,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstantEntry::Utf8(_) => "Utf8",
            ConstantEntry::Integer(_) => "Integer",
            ConstantEntry::Float(_) => "Float",
            ConstantEntry::Long(_) => "Long",
            ConstantEntry::Double(_) => "Double",
            ConstantEntry::String { .. } => "String",
            ConstantEntry::Class { .. } => "Class",
            ConstantEntry::NameAndType { .. } => "NameAndType",
            ConstantEntry::Fieldref(_) => "Fieldref",
            ConstantEntry::Methodref(_) => "Methodref",
            ConstantEntry::InterfaceMethodref(_) => "InterfaceMethodref",
            ConstantEntry::MethodHandle { .. } => "MethodHandle",
            ConstantEntry::MethodType { .. } => "MethodType",
            ConstantEntry::InvokeDynamic { .. } => "InvokeDynamic",
        }
    }

    /// Long and Double take up two pool indices.
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantEntry::Long(_) | ConstantEntry::Double(_))
    }
}

fn read_member_ref(cursor: &mut ByteCursor) -> DecodeResult<MemberRef> {
    Ok(MemberRef {
        class_index: cursor.read_u16()?,
        name_and_type_index: cursor.read_u16()?,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Reserved,
    Entry(ConstantEntry),
    Padding,
}

/// A field or method reference with every index resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMemberRef<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    count: u16,
    slots: Vec<Slot>,
}

impl ConstantPool {
    pub fn read(cursor: &mut ByteCursor) -> DecodeResult<Self> {
        let count = cursor.read_u16()?;
        let mut slots = Vec::with_capacity(count as usize);
        if count > 0 {
            slots.push(Slot::Reserved);
        }

        let mut index = 1u32;
        while index < count as u32 {
            let entry = ConstantEntry::read(cursor, index as u16)?;
            let wide = entry.is_wide();
            slots.push(Slot::Entry(entry));
            index += 1;
            if wide {
                if index < count as u32 {
                    slots.push(Slot::Padding);
                }
                index += 1;
            }
        }

        Ok(Self { count, slots })
    }

    /// The count as reported in the class file, one more than the highest index.
    pub fn len(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count <= 1
    }

    /// Number of indices that hold an actual entry.
    pub fn addressable_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Entry(_)))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantEntry)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Entry(entry) => Some((i as u16, entry)),
            _ => None,
        })
    }

    pub fn get(&self, index: u16) -> DecodeResult<&ConstantEntry> {
        match self.slots.get(index as usize) {
            Some(Slot::Entry(entry)) => Ok(entry),
            _ => Err(ClassFormatError::InvalidIndex(index)),
        }
    }

    fn mismatch(&self, index: u16, expected: &'static str, found: &ConstantEntry) -> ClassFormatError {
        ClassFormatError::WrongConstantKind {
            index,
            expected,
            found: found.kind_name(),
        }
    }

    pub fn resolve_utf8(&self, index: u16) -> DecodeResult<&str> {
        match self.get(index)? {
            ConstantEntry::Utf8(s) => Ok(s),
            other => Err(self.mismatch(index, "Utf8", other)),
        }
    }

    pub fn resolve_class_name(&self, index: u16) -> DecodeResult<&str> {
        match *self.get(index)? {
            ConstantEntry::Class { name_index } => self.resolve_utf8(name_index),
            ref other => Err(self.mismatch(index, "Class", other)),
        }
    }

    /// Returns `(name, descriptor)`.
    pub fn resolve_name_and_type(&self, index: u16) -> DecodeResult<(&str, &str)> {
        match *self.get(index)? {
            ConstantEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((
                self.resolve_utf8(name_index)?,
                self.resolve_utf8(descriptor_index)?,
            )),
            ref other => Err(self.mismatch(index, "NameAndType", other)),
        }
    }

    pub fn resolve_string(&self, index: u16) -> DecodeResult<&str> {
        match *self.get(index)? {
            ConstantEntry::String { string_index } => self.resolve_utf8(string_index),
            ref other => Err(self.mismatch(index, "String", other)),
        }
    }

    pub fn resolve_member_ref(&self, index: u16) -> DecodeResult<ResolvedMemberRef<'_>> {
        let member = match self.get(index)? {
            ConstantEntry::Fieldref(m)
            | ConstantEntry::Methodref(m)
            | ConstantEntry::InterfaceMethodref(m) => *m,
            other => return Err(self.mismatch(index, "Fieldref or Methodref", other)),
        };
        let class_name = self.resolve_class_name(member.class_index)?;
        let (name, descriptor) = self.resolve_name_and_type(member.name_and_type_index)?;
        Ok(ResolvedMemberRef {
            class_name,
            name,
            descriptor,
        })
    }

    /// Checks that every index stored inside the pool points at an entry of
    /// the right kind.
    pub fn validate(&self) -> DecodeResult<()> {
        for (_, entry) in self.iter() {
            match *entry {
                ConstantEntry::String { string_index } => {
                    self.resolve_utf8(string_index)?;
                }
                ConstantEntry::Class { name_index } => {
                    self.resolve_utf8(name_index)?;
                }
                ConstantEntry::NameAndType {
                    name_index,
                    descriptor_index,
                } => {
                    self.resolve_utf8(name_index)?;
                    self.resolve_utf8(descriptor_index)?;
                }
                ConstantEntry::Fieldref(m)
                | ConstantEntry::Methodref(m)
                | ConstantEntry::InterfaceMethodref(m) => {
                    self.resolve_class_name(m.class_index)?;
                    self.resolve_name_and_type(m.name_and_type_index)?;
                }
                ConstantEntry::MethodHandle {
                    reference_index, ..
                } => {
                    self.resolve_member_ref(reference_index)?;
                }
                ConstantEntry::MethodType { descriptor_index } => {
                    self.resolve_utf8(descriptor_index)?;
                }
                ConstantEntry::InvokeDynamic {
                    name_and_type_index,
                    ..
                } => {
                    self.resolve_name_and_type(name_and_type_index)?;
                }
                ConstantEntry::Utf8(_)
                | ConstantEntry::Integer(_)
                | ConstantEntry::Float(_)
                | ConstantEntry::Long(_)
                | ConstantEntry::Double(_) => {}
            }
        }
        Ok(())
    }
}
