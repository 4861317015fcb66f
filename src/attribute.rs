//! Attribute tables of classes, fields, methods and `Code`.
//!
//! Attributes are selected by their name string rather than a tag. Names we do
//! not model are kept as raw bytes so that decoding can carry on past them.

use crate::constant_pool::ConstantPool;
use crate::error::{ClassFormatError, DecodeResult};
use crate::reader::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// 0 catches everything.
    pub catch_type: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableEntry {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<AttributeRecord>,
}

impl CodeAttribute {
    fn read(cursor: &mut ByteCursor, pool: &ConstantPool) -> DecodeResult<Self> {
        let max_stack = cursor.read_u16()?;
        let max_locals = cursor.read_u16()?;
        let code_len = cursor.read_u32()? as usize;
        let code = cursor.read_bytes(code_len)?;

        let handlers = cursor.read_u16()?;
        let exception_table = (0..handlers)
            .map(|_| -> DecodeResult<ExceptionTableEntry> {
                Ok(ExceptionTableEntry {
                    start_pc: cursor.read_u16()?,
                    end_pc: cursor.read_u16()?,
                    handler_pc: cursor.read_u16()?,
                    catch_type: cursor.read_u16()?,
                })
            })
            .collect::<DecodeResult<Vec<_>>>()?;

        let attributes = read_table(cursor, pool, true)?;

        Ok(Self {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    pub fn line_number_table(&self) -> Option<&[LineNumberEntry]> {
        self.attributes.iter().find_map(|a| match a {
            AttributeRecord::LineNumberTable(lines) => Some(lines.as_slice()),
            _ => None,
        })
    }

    /// Source line of the instruction at `pc`, if line numbers were compiled in.
    pub fn line_number(&self, pc: u16) -> Option<u16> {
        self.line_number_table()?
            .iter()
            .filter(|l| l.start_pc <= pc)
            .max_by_key(|l| l.start_pc)
            .map(|l| l.line_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeRecord {
    Code(CodeAttribute),
    ConstantValue { index: u16 },
    SourceFile { index: u16 },
    Deprecated,
    Synthetic,
    Exceptions { exception_indices: Vec<u16> },
    LineNumberTable(Vec<LineNumberEntry>),
    LocalVariableTable(Vec<LocalVariableEntry>),
    Unknown { name: String, data: Vec<u8> },
}

impl AttributeRecord {
    pub fn name(&self) -> &str {
        match self {
            AttributeRecord::Code(_) => "Code",
            AttributeRecord::ConstantValue { .. } => "ConstantValue",
            AttributeRecord::SourceFile { .. } => "SourceFile",
            AttributeRecord::Deprecated => "Deprecated",
            AttributeRecord::Synthetic => "Synthetic",
            AttributeRecord::Exceptions { .. } => "Exceptions",
            AttributeRecord::LineNumberTable(_) => "LineNumberTable",
            AttributeRecord::LocalVariableTable(_) => "LocalVariableTable",
            AttributeRecord::Unknown { name, .. } => name,
        }
    }
}

/// Reads a class, field or method attribute table.
pub fn read_attributes(cursor: &mut ByteCursor, pool: &ConstantPool) -> DecodeResult<Vec<AttributeRecord>> {
    read_table(cursor, pool, false)
}

pub fn read_attribute(cursor: &mut ByteCursor, pool: &ConstantPool) -> DecodeResult<AttributeRecord> {
    read_one(cursor, pool, false)
}

/// `in_code` is set for the table inside a `Code` attribute, where another
/// `Code` is not allowed.
fn read_table(cursor: &mut ByteCursor, pool: &ConstantPool, in_code: bool) -> DecodeResult<Vec<AttributeRecord>> {
    let count = cursor.read_u16()?;
    (0..count).map(|_| read_one(cursor, pool, in_code)).collect()
}

fn read_one(cursor: &mut ByteCursor, pool: &ConstantPool, in_code: bool) -> DecodeResult<AttributeRecord> {
    let name_index = cursor.read_u16()?;
    let name = pool.resolve_utf8(name_index)?;
    let declared = cursor.read_u32()?;
    let mut body = cursor.sub_cursor(declared as usize)?;

    let record = match name {
        "Code" if in_code => return Err(ClassFormatError::NestedCode),
        "Code" => AttributeRecord::Code(CodeAttribute::read(&mut body, pool)?),
        "ConstantValue" => AttributeRecord::ConstantValue {
            index: body.read_u16()?,
        },
        "SourceFile" => AttributeRecord::SourceFile {
            index: body.read_u16()?,
        },
        "Deprecated" => AttributeRecord::Deprecated,
        "Synthetic" => AttributeRecord::Synthetic,
        "Exceptions" => AttributeRecord::Exceptions {
            exception_indices: body.read_u16s()?,
        },
        "LineNumberTable" => {
            let count = body.read_u16()?;
            let lines = (0..count)
                .map(|_| -> DecodeResult<LineNumberEntry> {
                    Ok(LineNumberEntry {
                        start_pc: body.read_u16()?,
                        line_number: body.read_u16()?,
                    })
                })
                .collect::<DecodeResult<Vec<_>>>()?;
            AttributeRecord::LineNumberTable(lines)
        }
        "LocalVariableTable" => {
            let count = body.read_u16()?;
            let vars = (0..count)
                .map(|_| -> DecodeResult<LocalVariableEntry> {
                    Ok(LocalVariableEntry {
                        start_pc: body.read_u16()?,
                        length: body.read_u16()?,
                        name_index: body.read_u16()?,
                        descriptor_index: body.read_u16()?,
                        index: body.read_u16()?,
                    })
                })
                .collect::<DecodeResult<Vec<_>>>()?;
            AttributeRecord::LocalVariableTable(vars)
        }
        _ => {
            let data = body.read_bytes(body.remaining())?;
            return Ok(AttributeRecord::Unknown {
                name: name.to_string(),
                data,
            });
        }
    };

    if !body.is_empty() {
        return Err(ClassFormatError::AttributeLength {
            name: name.to_string(),
            declared,
            consumed: body.position(),
        });
    }
    Ok(record)
}
