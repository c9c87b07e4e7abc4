//! PEM/DER encoding of group parameters
//!
//! Parameters are stored as the PKCS#3 `DHParameter` structure
//!
//! ```text
//! DHParameter ::= SEQUENCE {
//!     prime              INTEGER,  -- p
//!     base               INTEGER,  -- g
//!     privateValueLength INTEGER OPTIONAL }
//! ```
//!
//! inside a `DH PARAMETERS` PEM envelope, the same layout OpenSSL writes.
//! Decoding follows exactly this field layout; `privateValueLength` is
//! accepted and ignored.

use num_bigint::BigUint;

use super::{DhError, Group};

const PEM_TAG: &str = "DH PARAMETERS";

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x30;

impl Group {
    /// Encode the group as a DER `DHParameter`
    pub fn to_der(&self) -> Vec<u8> {
        let mut body = Vec::new();
        write_integer(&mut body, self.p());
        write_integer(&mut body, self.g());

        let mut out = Vec::with_capacity(body.len() + 4);
        write_header(&mut out, TAG_SEQUENCE, body.len());
        out.extend_from_slice(&body);
        out
    }

    /// Decode a DER `DHParameter`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The encoding is truncated, non-minimal or has trailing bytes
    /// - An integer is negative
    /// - The decoded parameters fail [`Group::validate`]
    pub fn from_der(der: &[u8]) -> Result<Self, DhError> {
        let mut outer = DerReader::new(der);
        let body = outer.read(TAG_SEQUENCE)?;
        outer.finish()?;

        let mut fields = DerReader::new(body);
        let p = fields.read_integer()?;
        let g = fields.read_integer()?;
        if !fields.is_empty() {
            // privateValueLength
            fields.read_integer()?;
        }
        fields.finish()?;

        Group::new(p, g)
    }

    /// Encode the group as a `DH PARAMETERS` PEM document
    pub fn to_pem(&self) -> String {
        let pem = pem::Pem::new(PEM_TAG, self.to_der());
        pem::encode(&pem)
    }

    /// Parse a `DH PARAMETERS` PEM document
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The PEM string is malformed
    /// - The PEM tag is not "DH PARAMETERS"
    /// - The DER contents do not decode, see [`Group::from_der`]
    pub fn from_pem(pem_str: &str) -> Result<Self, DhError> {
        let pem = pem::parse(pem_str)?;
        if pem.tag() != PEM_TAG {
            return Err(DhError::UnexpectedPemTag(pem.tag().to_string()));
        }
        Self::from_der(pem.contents())
    }
}

fn write_header(out: &mut Vec<u8>, tag: u8, len: usize) {
    out.push(tag);
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let len_bytes = len.to_be_bytes();
    let skip = len_bytes.iter().take_while(|b| **b == 0).count();
    out.push(0x80 | (len_bytes.len() - skip) as u8);
    out.extend_from_slice(&len_bytes[skip..]);
}

fn write_integer(out: &mut Vec<u8>, value: &BigUint) {
    let mut content = value.to_bytes_be();
    // keep the value positive in two's complement
    if content[0] & 0x80 != 0 {
        content.insert(0, 0);
    }
    write_header(out, TAG_INTEGER, content.len());
    out.extend_from_slice(&content);
}

struct DerReader<'a> {
    data: &'a [u8],
}

impl<'a> DerReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn finish(&self) -> Result<(), DhError> {
        if !self.data.is_empty() {
            return Err(DhError::Der(format!("{} trailing bytes", self.data.len())));
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DhError> {
        if self.data.len() < n {
            return Err(DhError::Der("unexpected end of input".to_string()));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    /// Read one TLV with the expected tag and return its contents
    fn read(&mut self, tag: u8) -> Result<&'a [u8], DhError> {
        let found = self.take(1)?[0];
        if found != tag {
            return Err(DhError::Der(format!(
                "expected tag {tag:#04x}, found {found:#04x}"
            )));
        }

        let first = self.take(1)?[0];
        let len = if first < 0x80 {
            first as usize
        } else {
            let count = (first & 0x7f) as usize;
            if count == 0 {
                return Err(DhError::Der("indefinite length".to_string()));
            }
            if count > std::mem::size_of::<usize>() {
                return Err(DhError::Der("length too large".to_string()));
            }
            let bytes = self.take(count)?;
            if bytes[0] == 0 {
                return Err(DhError::Der("non-minimal length".to_string()));
            }
            let len = bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
            if len < 0x80 {
                return Err(DhError::Der("non-minimal length".to_string()));
            }
            len
        };

        self.take(len)
    }

    fn read_integer(&mut self) -> Result<BigUint, DhError> {
        let content = self.read(TAG_INTEGER)?;
        match content {
            [] => Err(DhError::Der("empty integer".to_string())),
            [first, ..] if first & 0x80 != 0 => {
                Err(DhError::Der("negative integer".to_string()))
            }
            [0, second, ..] if second & 0x80 == 0 => {
                Err(DhError::Der("non-minimal integer".to_string()))
            }
            _ => Ok(BigUint::from_bytes_be(content)),
        }
    }
}
