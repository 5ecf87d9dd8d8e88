use std::fmt::Write as _;

use crate::plan::ScalarType;

/// Access mode of a storage binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
}

impl Access {
    fn wgsl(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadWrite => "read_write",
        }
    }
}

/// Small indented WGSL builder.
///
/// Kernels are assembled from typed declarations and fixed body lines; the
/// writer owns indentation and formatting so generated text is stable.
#[derive(Default)]
pub struct WgslWriter {
    out: String,
    indent: usize,
}

impl WgslWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_f16(&mut self) {
        self.line("enable f16;");
        self.blank();
    }

    pub fn comment(&mut self, text: &str) {
        for part in text.lines() {
            self.line(&format!("// {part}"));
        }
    }

    pub fn const_u32(&mut self, name: &str, value: u32) {
        self.line(&format!("const {name}: u32 = {value}u;"));
    }

    pub fn const_float(&mut self, name: &str, ty: ScalarType, value: f64) {
        self.line(&format!(
            "const {name}: {} = {};",
            ty.wgsl_name(),
            ty.literal(value)
        ));
    }

    pub fn storage(&mut self, binding: u32, name: &str, access: Access, element: &str) {
        self.line(&format!(
            "@group(0) @binding({binding}) var<storage, {}> {name}: array<{element}>;",
            access.wgsl()
        ));
    }

    pub fn workgroup_array(&mut self, name: &str, element: &str, len: u32) {
        self.line(&format!("var<workgroup> {name}: array<{element}, {len}>;"));
    }

    pub fn entry_point(&mut self, local: [u32; 3], params: &str) {
        self.line(&format!(
            "@compute @workgroup_size({}, {}, {})",
            local[0], local[1], local[2]
        ));
        self.open(&format!("fn main({params})"));
    }

    /// Emit `header {` and indent until the matching [`close`](Self::close).
    pub fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
    }

    pub fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    pub fn lines(&mut self, body: &[&str]) {
        for l in body {
            self.line(l);
        }
    }

    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        let _ = writeln!(self.out, "{text}");
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Complex sample type for `scalar`.
pub fn vec2_of(scalar: ScalarType) -> String {
    format!("vec2<{}>", scalar.wgsl_name())
}
