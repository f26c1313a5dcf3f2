//! Source text for the accessor class.

use std::collections::HashSet;

use resforge_common::ident::sanitize_identifier;

use crate::language::Language;

const HEADER: [&str; 4] = [
    "<auto-generated>",
    "    Generated by resforge from the resource names of the set.",
    "    Changes to this file are lost when it is regenerated.",
    "</auto-generated>",
];

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const VB_KEYWORDS: &[&str] = &[
    "addhandler", "and", "as", "boolean", "byref", "byte", "byval", "call", "case", "catch",
    "class", "const", "date", "decimal", "declare", "default", "dim", "do", "double", "each",
    "else", "end", "enum", "error", "event", "exit", "false", "finally", "for", "friend",
    "function", "get", "global", "handles", "if", "imports", "in", "integer", "is", "let",
    "long", "loop", "me", "module", "mod", "namespace", "new", "next", "not", "nothing",
    "object", "of", "on", "option", "or", "private", "property", "protected", "public",
    "resume", "return", "select", "set", "shared", "short", "single", "static", "step",
    "stop", "string", "structure", "sub", "then", "throw", "to", "true", "try", "type",
    "until", "when", "while", "with",
];

/// Member names the class itself declares.
const RESERVED_MEMBERS: [&str; 2] = ["ResourceManager", "Culture"];

/// One generated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The identifier as written in source, escaped if it is a keyword.
    pub identifier: String,
    /// The resource name looked up at runtime.
    pub resource_name: String,
}

/// Everything needed to print one accessor class.
#[derive(Debug, Clone)]
pub struct ClassSpec<'a> {
    /// Target language.
    pub language: Language,
    /// Enclosing namespace, if any.
    pub namespace: Option<&'a str>,
    /// The class name.
    pub class_name: &'a str,
    /// Public instead of assembly-internal visibility.
    pub public: bool,
    /// Manifest name of the compiled resources.
    pub base_name: String,
    /// Properties in resource order.
    pub properties: Vec<Property>,
}

fn escape_keyword(language: Language, ident: String) -> String {
    match language {
        Language::CSharp if CSHARP_KEYWORDS.contains(&ident.as_str()) => format!("@{ident}"),
        Language::VisualBasic if VB_KEYWORDS.contains(&ident.to_ascii_lowercase().as_str()) => {
            format!("[{ident}]")
        }
        _ => ident,
    }
}

/// Maps resource names to property identifiers.
///
/// Names are sanitized; a name that collides with an earlier property, the
/// class name or a built-in member is skipped.
pub fn properties(language: Language, class_name: &str, names: &[String]) -> Vec<Property> {
    let fold = |s: &str| {
        if language.is_case_insensitive() {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };
    let mut taken: HashSet<String> = RESERVED_MEMBERS.iter().map(|m| fold(*m)).collect();
    taken.insert(fold(class_name));

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let ident = sanitize_identifier(name);
        if !taken.insert(fold(&ident)) {
            tracing::debug!(resource = %name, identifier = %ident, "skipping colliding accessor property");
            continue;
        }
        out.push(Property {
            identifier: escape_keyword(language, ident),
            resource_name: name.clone(),
        });
    }
    out
}

struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

fn csharp_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn vb_literal(s: &str) -> String {
    let mut parts = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '"' => current.push_str("\"\""),
            c if c.is_control() => {
                parts.push(format!("\"{current}\""));
                parts.push(format!("ChrW({})", c as u32));
                current.clear();
            }
            c => current.push(c),
        }
    }
    parts.push(format!("\"{current}\""));
    parts.join(" & ")
}

/// Renders the class source.
pub fn render(spec: &ClassSpec<'_>) -> String {
    match spec.language {
        Language::CSharp => render_csharp(spec),
        Language::VisualBasic => render_vb(spec),
    }
}

fn render_csharp(spec: &ClassSpec<'_>) -> String {
    let mut w = CodeWriter::new();
    let vis = if spec.public { "public" } else { "internal" };
    let class = spec.class_name;

    for line in HEADER {
        w.line(format!("// {line}").trim_end());
    }
    w.line("");
    if let Some(ns) = spec.namespace {
        w.line(&format!("namespace {ns}"));
        w.line("{");
        w.indent();
    }
    w.line("using System.Globalization;");
    w.line("using System.Resources;");
    w.line("");
    w.line(&format!("{vis} class {class}"));
    w.line("{");
    w.indent();
    w.line("private static ResourceManager resourceMan;");
    w.line("private static CultureInfo resourceCulture;");
    w.line("");
    w.line(&format!("{vis} {class}()"));
    w.line("{");
    w.line("}");
    w.line("");
    w.line(&format!("{vis} static ResourceManager ResourceManager"));
    w.line("{");
    w.indent();
    w.line("get");
    w.line("{");
    w.indent();
    w.line("if (resourceMan is null)");
    w.line("{");
    w.indent();
    w.line(&format!(
        "resourceMan = new ResourceManager({}, typeof({class}).Assembly);",
        csharp_literal(&spec.base_name)
    ));
    w.dedent();
    w.line("}");
    w.line("return resourceMan;");
    w.dedent();
    w.line("}");
    w.dedent();
    w.line("}");
    w.line("");
    w.line(&format!("{vis} static CultureInfo Culture"));
    w.line("{");
    w.indent();
    w.line("get { return resourceCulture; }");
    w.line("set { resourceCulture = value; }");
    w.dedent();
    w.line("}");

    for prop in &spec.properties {
        w.line("");
        w.line(&format!("{vis} static string {}", prop.identifier));
        w.line("{");
        w.indent();
        w.line(&format!(
            "get {{ return ResourceManager.GetString({}, resourceCulture); }}",
            csharp_literal(&prop.resource_name)
        ));
        w.dedent();
        w.line("}");
    }

    w.dedent();
    w.line("}");
    if spec.namespace.is_some() {
        w.dedent();
        w.line("}");
    }
    w.out
}

fn render_vb(spec: &ClassSpec<'_>) -> String {
    let mut w = CodeWriter::new();
    let vis = if spec.public { "Public" } else { "Friend" };
    let class = spec.class_name;

    for line in HEADER {
        w.line(format!("' {line}").trim_end());
    }
    w.line("");
    w.line("Option Strict On");
    w.line("Option Explicit On");
    w.line("");
    w.line("Imports System.Globalization");
    w.line("Imports System.Resources");
    w.line("");
    if let Some(ns) = spec.namespace {
        w.line(&format!("Namespace {ns}"));
        w.indent();
    }
    w.line(&format!("{vis} Class {class}"));
    w.indent();
    w.line("Private Shared resourceMan As ResourceManager");
    w.line("Private Shared resourceCulture As CultureInfo");
    w.line("");
    w.line(&format!("{vis} Shared ReadOnly Property ResourceManager() As ResourceManager"));
    w.indent();
    w.line("Get");
    w.indent();
    w.line("If resourceMan Is Nothing Then");
    w.indent();
    w.line(&format!(
        "resourceMan = New ResourceManager({}, GetType({class}).Assembly)",
        vb_literal(&spec.base_name)
    ));
    w.dedent();
    w.line("End If");
    w.line("Return resourceMan");
    w.dedent();
    w.line("End Get");
    w.dedent();
    w.line("End Property");
    w.line("");
    w.line(&format!("{vis} Shared Property Culture() As CultureInfo"));
    w.indent();
    w.line("Get");
    w.indent();
    w.line("Return resourceCulture");
    w.dedent();
    w.line("End Get");
    w.line("Set(ByVal value As CultureInfo)");
    w.indent();
    w.line("resourceCulture = value");
    w.dedent();
    w.line("End Set");
    w.dedent();
    w.line("End Property");

    for prop in &spec.properties {
        w.line("");
        w.line(&format!(
            "{vis} Shared ReadOnly Property {}() As String",
            prop.identifier
        ));
        w.indent();
        w.line("Get");
        w.indent();
        w.line(&format!(
            "Return ResourceManager.GetString({}, resourceCulture)",
            vb_literal(&prop.resource_name)
        ));
        w.dedent();
        w.line("End Get");
        w.dedent();
        w.line("End Property");
    }

    w.dedent();
    w.line("End Class");
    if spec.namespace.is_some() {
        w.dedent();
        w.line("End Namespace");
    }
    w.out
}
