//! A small builder for the text the engine assembles itself.
//!
//! Every section body is an ordered list of named members. Entries render
//! in push order, each on its own lines, starting at column zero; nested
//! bodies are indented two spaces. Leaf emitters return unindented text and
//! the fragment owns all indentation, so every section has the same shape
//! whether it came from a leaf emitter or from here.

/// One named member of a section body.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    doc: Option<String>,
    key: String,
    body: Body,
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    /// `key: { <text> }`
    Block(String),
    /// `key: { a: A; b: B; }`
    Record(Vec<(String, String)>),
    /// `key: T;`
    Type(String),
}

impl Entry {
    /// A container whose body is pre-rendered text.
    pub fn block(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            doc: None,
            key: key.into(),
            body: Body::Block(body.into()),
        }
    }

    /// A container with a fixed list of typed members.
    pub fn record<K, T>(key: impl Into<String>, members: impl IntoIterator<Item = (K, T)>) -> Self
    where
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            doc: None,
            key: key.into(),
            body: Body::Record(
                members
                    .into_iter()
                    .map(|(k, t)| (k.into(), t.into()))
                    .collect(),
            ),
        }
    }

    /// A single typed member.
    pub fn member(key: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            doc: None,
            key: key.into(),
            body: Body::Type(ty.into()),
        }
    }

    /// Attach a JSDoc comment. Blank descriptions are dropped.
    pub fn with_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        self
    }
}

/// Ordered list of entries sharing one `readonly` setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    readonly: bool,
    entries: Vec<Entry>,
}

impl Fragment {
    pub fn new(readonly: bool) -> Self {
        Self {
            readonly,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: Entry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn render(&self) -> String {
        let ro = if self.readonly { "readonly " } else { "" };
        let mut out = String::new();
        for entry in &self.entries {
            if let Some(ref doc) = entry.doc {
                out.push_str(&doc_comment(doc));
            }
            match entry.body {
                Body::Block(ref text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        out.push_str(&format!("{ro}{}: {{}}\n", entry.key));
                    } else {
                        out.push_str(&format!("{ro}{}: {{\n", entry.key));
                        out.push_str(&indent(text, 2));
                        out.push_str("\n}\n");
                    }
                }
                Body::Record(ref members) => {
                    out.push_str(&format!("{ro}{}: {{\n", entry.key));
                    for (name, ty) in members {
                        out.push_str(&format!("  {ro}{name}: {ty};\n"));
                    }
                    out.push_str("}\n");
                }
                Body::Type(ref ty) => {
                    out.push_str(&format!("{ro}{}: {ty};\n", entry.key));
                }
            }
        }
        out
    }
}

/// Quote a property key or index as a string literal.
pub fn quote(key: &str) -> String {
    serde_json::Value::String(key.to_string()).to_string()
}

/// Indent every non-empty line of `text` by `width` spaces.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + if text.ends_with('\n') { "\n" } else { "" }
}

/// Render a JSDoc comment, one line per description line.
pub fn doc_comment(text: &str) -> String {
    let text = text.trim().replace("*/", "*\\/");
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    if lines.len() <= 1 {
        return format!("/** {text} */\n");
    }
    let mut out = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {line}\n"));
        }
    }
    out.push_str(" */\n");
    out
}
