#![allow(dead_code)]

use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

/// Temp directory for one test, deleted when dropped.
pub struct TempDir(PathBuf);

impl Deref for TempDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub fn temp_dir(name: &str) -> TempDir {
    let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
    let p = std::env::temp_dir().join(format!("classload_it_{}_{n}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&p);
    std::fs::create_dir_all(&p).unwrap();
    TempDir(p)
}

pub fn write_file(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    use zip::write::FileOptions;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(())
}

/// Assembles class files byte by byte.
#[derive(Default)]
pub struct ClassBuilder {
    next_index: u16,
    pool: Vec<u8>,
    pub major: u16,
    pub minor: u16,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<Vec<u8>>,
    pub methods: Vec<Vec<u8>>,
    pub attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    pub fn new(this: &str, super_class: Option<&str>) -> Self {
        let mut b = Self {
            next_index: 1,
            major: 52,
            access_flags: 0x0021,
            ..Self::default()
        };
        b.this_class = b.class(this);
        let super_index = super_class.map_or(0, |s| b.class(s));
        b.super_class = super_index;
        b
    }

    fn push(&mut self, bytes: &[u8], slots: u16) -> u16 {
        let index = self.next_index;
        self.pool.extend_from_slice(bytes);
        self.next_index += slots;
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&(s.len() as u16).to_be_bytes());
        bytes.extend_from_slice(s.as_bytes());
        self.push(&bytes, 1)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut bytes = vec![7];
        bytes.extend_from_slice(&name_index.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn string(&mut self, s: &str) -> u16 {
        let utf8 = self.utf8(s);
        let mut bytes = vec![8];
        bytes.extend_from_slice(&utf8.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn long(&mut self, v: i64) -> u16 {
        let mut bytes = vec![5];
        bytes.extend_from_slice(&v.to_be_bytes());
        self.push(&bytes, 2)
    }

    pub fn double(&mut self, v: f64) -> u16 {
        let mut bytes = vec![6];
        bytes.extend_from_slice(&v.to_bits().to_be_bytes());
        self.push(&bytes, 2)
    }

    pub fn integer(&mut self, v: i32) -> u16 {
        let mut bytes = vec![3];
        bytes.extend_from_slice(&v.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let n = self.utf8(name);
        let d = self.utf8(descriptor);
        let mut bytes = vec![12];
        bytes.extend_from_slice(&n.to_be_bytes());
        bytes.extend_from_slice(&d.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let c = self.class(class);
        let nt = self.name_and_type(name, descriptor);
        let mut bytes = vec![10];
        bytes.extend_from_slice(&c.to_be_bytes());
        bytes.extend_from_slice(&nt.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn attribute(&mut self, name: &str, body: &[u8]) -> Vec<u8> {
        let name_index = self.utf8(name);
        let mut out = name_index.to_be_bytes().to_vec();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    pub fn code(&mut self, max_stack: u16, max_locals: u16, code: &[u8], handlers: &[[u16; 4]], nested: &[Vec<u8>]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&max_stack.to_be_bytes());
        body.extend_from_slice(&max_locals.to_be_bytes());
        body.extend_from_slice(&(code.len() as u32).to_be_bytes());
        body.extend_from_slice(code);
        body.extend_from_slice(&(handlers.len() as u16).to_be_bytes());
        for h in handlers {
            for v in h {
                body.extend_from_slice(&v.to_be_bytes());
            }
        }
        body.extend_from_slice(&table(nested));
        self.attribute("Code", &body)
    }

    pub fn member(&mut self, access_flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
        let n = self.utf8(name);
        let d = self.utf8(descriptor);
        let mut out = access_flags.to_be_bytes().to_vec();
        out.extend_from_slice(&n.to_be_bytes());
        out.extend_from_slice(&d.to_be_bytes());
        out.extend_from_slice(&table(attributes));
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0xca, 0xfe, 0xba, 0xbe];
        out.extend_from_slice(&self.minor.to_be_bytes());
        out.extend_from_slice(&self.major.to_be_bytes());
        out.extend_from_slice(&self.next_index.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for i in &self.interfaces {
            out.extend_from_slice(&i.to_be_bytes());
        }
        out.extend_from_slice(&table(&self.fields));
        out.extend_from_slice(&table(&self.methods));
        out.extend_from_slice(&table(&self.attributes));
        out
    }
}

pub fn table(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = (items.len() as u16).to_be_bytes().to_vec();
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// A minimal class: `name extends java/lang/Object` with one `main` method.
pub fn simple_class(name: &str) -> Vec<u8> {
    let mut b = ClassBuilder::new(name, Some("java/lang/Object"));
    let code = b.code(0, 1, &[0xb1], &[], &[]);
    let main = b.member(0x0009, "main", "([Ljava/lang/String;)V", &[code]);
    b.methods.push(main);
    b.build()
}
