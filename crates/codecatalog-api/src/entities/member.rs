use serde::{Deserialize, Serialize};

/// One bracketed array dimension of a struct member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayDimension {
    /// Numeric literal size: `[32]`
    Fixed(u64),
    /// Macro or expression size: `[MAX_NAME_LEN]`
    Symbolic(String),
    /// Flexible array member: `[]`
    Unsized,
}

impl ArrayDimension {
    /// Classify the text between the brackets
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            ArrayDimension::Unsized
        } else if let Ok(size) = text.parse::<u64>() {
            ArrayDimension::Fixed(size)
        } else {
            ArrayDimension::Symbolic(text.to_string())
        }
    }
}

/// A member declaration inside a struct or union body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructMember {
    /// Member name
    pub name: String,

    /// Declared type, without pointer markers
    pub type_name: String,

    /// `struct`, `union` or `enum` when the type was written with one
    pub type_keyword: Option<String>,

    pub is_pointer: bool,

    /// Number of `*` in the declaration
    pub pointer_count: usize,

    /// Array dimensions, outermost first
    pub array_dimensions: Vec<ArrayDimension>,

    /// Bit-field width
    pub bit_width: Option<u32>,

    /// Trailing comment on the same line
    pub documentation: Option<String>,

    /// The declaration line as written
    pub raw: String,
}

impl StructMember {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            type_keyword: None,
            is_pointer: false,
            pointer_count: 0,
            array_dimensions: Vec::new(),
            bit_width: None,
            documentation: None,
            raw: String::new(),
        }
    }

    pub fn with_pointers(mut self, count: usize) -> Self {
        self.pointer_count = count;
        self.is_pointer = count > 0;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.type_keyword = Some(keyword.into());
        self
    }

    pub fn with_dimensions(mut self, dims: Vec<ArrayDimension>) -> Self {
        self.array_dimensions = dims;
        self
    }

    pub fn with_bit_width(mut self, width: u32) -> Self {
        self.bit_width = Some(width);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// The outermost array dimension, if the member is an array
    pub fn array_size(&self) -> Option<&ArrayDimension> {
        self.array_dimensions.first()
    }

    pub fn is_array(&self) -> bool {
        !self.array_dimensions.is_empty()
    }

    pub fn is_bit_field(&self) -> bool {
        self.bit_width.is_some()
    }
}
