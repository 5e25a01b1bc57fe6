// src/processing/grammar.rs

use super::lexer::{BlockRule, CommentClass, Lexer, LineRule, StringRule, Syntax, TripleQuotes};
use std::path::Path;

/// Languages whose comments the remover understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    C,
    Cpp,
    CSharp,
    Java,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    Swift,
    Kotlin,
    Scala,
    Php,
    Css,
    Scss,
    Python,
    Ruby,
    Perl,
    R,
    Shell,
    Makefile,
    Dockerfile,
    Yaml,
    Toml,
    Ini,
    Sql,
    Lua,
    Haskell,
    Html,
    Xml,
    Assembly,
    Matlab,
    Json,
}

impl Grammar {
    /// Looks the grammar up by extension, then by file name.
    pub fn for_path(path: &Path) -> Option<Grammar> {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::for_extension(&e.to_ascii_lowercase()));
        by_extension.or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(Self::for_file_name)
        })
    }

    pub fn for_extension(ext: &str) -> Option<Grammar> {
        let grammar = match ext {
            "c" | "h" => Grammar::C,
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" => Grammar::Cpp,
            "cs" => Grammar::CSharp,
            "java" => Grammar::Java,
            "js" | "jsx" | "mjs" | "cjs" => Grammar::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Grammar::TypeScript,
            "go" => Grammar::Go,
            "rs" => Grammar::Rust,
            "swift" => Grammar::Swift,
            "kt" | "kts" => Grammar::Kotlin,
            "scala" | "sc" => Grammar::Scala,
            "php" => Grammar::Php,
            "css" => Grammar::Css,
            "scss" | "sass" | "less" => Grammar::Scss,
            "py" | "pyw" | "pyi" => Grammar::Python,
            "rb" | "rake" | "gemspec" => Grammar::Ruby,
            "pl" | "pm" | "perl" => Grammar::Perl,
            "r" => Grammar::R,
            "sh" | "bash" | "zsh" | "fish" => Grammar::Shell,
            "mk" | "mak" | "cmake" => Grammar::Makefile,
            "dockerfile" => Grammar::Dockerfile,
            "yml" | "yaml" => Grammar::Yaml,
            "toml" => Grammar::Toml,
            "ini" | "cfg" | "conf" => Grammar::Ini,
            "sql" => Grammar::Sql,
            "lua" => Grammar::Lua,
            "hs" | "lhs" => Grammar::Haskell,
            "html" | "htm" | "xhtml" => Grammar::Html,
            "xml" | "xsd" | "xsl" | "plist" => Grammar::Xml,
            "asm" | "s" | "nasm" => Grammar::Assembly,
            "m" => Grammar::Matlab,
            "json" => Grammar::Json,
            _ => return None,
        };
        Some(grammar)
    }

    pub fn for_file_name(name: &str) -> Option<Grammar> {
        let grammar = match name {
            "Makefile" | "makefile" | "GNUmakefile" | "CMakeLists.txt" => Grammar::Makefile,
            "Dockerfile" | "Containerfile" => Grammar::Dockerfile,
            "Gemfile" | "Rakefile" | "Vagrantfile" => Grammar::Ruby,
            ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" => Grammar::Shell,
            _ => return None,
        };
        Some(grammar)
    }

    pub fn name(self) -> &'static str {
        match self {
            Grammar::C => "c",
            Grammar::Cpp => "cpp",
            Grammar::CSharp => "csharp",
            Grammar::Java => "java",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Go => "go",
            Grammar::Rust => "rust",
            Grammar::Swift => "swift",
            Grammar::Kotlin => "kotlin",
            Grammar::Scala => "scala",
            Grammar::Php => "php",
            Grammar::Css => "css",
            Grammar::Scss => "scss",
            Grammar::Python => "python",
            Grammar::Ruby => "ruby",
            Grammar::Perl => "perl",
            Grammar::R => "r",
            Grammar::Shell => "bash",
            Grammar::Makefile => "make",
            Grammar::Dockerfile => "docker",
            Grammar::Yaml => "yaml",
            Grammar::Toml => "toml",
            Grammar::Ini => "ini",
            Grammar::Sql => "sql",
            Grammar::Lua => "lua",
            Grammar::Haskell => "haskell",
            Grammar::Html => "html",
            Grammar::Xml => "xml",
            Grammar::Assembly => "nasm",
            Grammar::Matlab => "matlab",
            Grammar::Json => "json",
        }
    }

    /// Produces a lazy token stream over `text`.
    pub fn tokens(self, text: &str) -> Lexer<'_> {
        Lexer::new(text, self.syntax())
    }

    fn syntax(self) -> &'static Syntax {
        match self {
            Grammar::C | Grammar::Cpp | Grammar::CSharp => &C_SYNTAX,
            Grammar::Java => &JAVA_SYNTAX,
            Grammar::JavaScript | Grammar::TypeScript => &JS_SYNTAX,
            Grammar::Go => &GO_SYNTAX,
            Grammar::Rust => &RUST_SYNTAX,
            Grammar::Swift => &SWIFT_SYNTAX,
            Grammar::Kotlin | Grammar::Scala => &KOTLIN_SYNTAX,
            Grammar::Php => &PHP_SYNTAX,
            Grammar::Css => &CSS_SYNTAX,
            Grammar::Scss => &SCSS_SYNTAX,
            Grammar::Python => &PYTHON_SYNTAX,
            Grammar::Ruby => &RUBY_SYNTAX,
            Grammar::Shell => &SHELL_SYNTAX,
            Grammar::Perl | Grammar::R | Grammar::Makefile | Grammar::Dockerfile => &HASH_SYNTAX,
            Grammar::Yaml => &YAML_SYNTAX,
            Grammar::Toml => &TOML_SYNTAX,
            Grammar::Ini => &INI_SYNTAX,
            Grammar::Sql => &SQL_SYNTAX,
            Grammar::Lua => &LUA_SYNTAX,
            Grammar::Haskell => &HASKELL_SYNTAX,
            Grammar::Html | Grammar::Xml => &MARKUP_SYNTAX,
            Grammar::Assembly => &ASM_SYNTAX,
            Grammar::Matlab => &MATLAB_SYNTAX,
            Grammar::Json => &JSON_SYNTAX,
        }
    }
}

const fn line(marker: &'static str, class: CommentClass) -> LineRule {
    LineRule {
        marker,
        class,
        unless_next: &[],
        needs_boundary: false,
    }
}

const fn block(open: &'static str, close: &'static str, class: CommentClass) -> BlockRule {
    BlockRule {
        open,
        close,
        class,
        unless_next: &[],
        nests: None,
    }
}

const fn string(delim: char, multiline: bool) -> StringRule {
    StringRule { delim, multiline }
}

const fn nested(rule: BlockRule, opener: &'static str) -> BlockRule {
    BlockRule {
        nests: Some(opener),
        ..rule
    }
}

const fn unless_next_line(rule: LineRule, chars: &'static [char]) -> LineRule {
    LineRule {
        unless_next: chars,
        ..rule
    }
}

const fn unless_next_block(rule: BlockRule, chars: &'static [char]) -> BlockRule {
    BlockRule {
        unless_next: chars,
        ..rule
    }
}

const fn at_boundary(rule: LineRule) -> LineRule {
    LineRule {
        needs_boundary: true,
        ..rule
    }
}

use CommentClass::{Doc, Generic, Multi, Single};

const SLASH_LINES: &[LineRule] = &[
    unless_next_line(line("///", Doc), &['/']),
    line("//!", Doc),
    line("//", Single),
];

const SLASH_BLOCKS: &[BlockRule] = &[
    unless_next_block(block("/**", "*/", Doc), &['/', '*']),
    block("/*!", "*/", Doc),
    block("/*", "*/", Multi),
];

const NESTED_SLASH_BLOCKS: &[BlockRule] = &[
    nested(unless_next_block(block("/**", "*/", Doc), &['/', '*']), "/*"),
    nested(block("/*!", "*/", Doc), "/*"),
    nested(block("/*", "*/", Multi), "/*"),
];

const HASH_LINES: &[LineRule] = &[line("#", Generic)];

const fn syntax(
    lines: &'static [LineRule],
    blocks: &'static [BlockRule],
    strings: &'static [StringRule],
) -> Syntax {
    Syntax {
        lines,
        blocks,
        strings,
        triple_quotes: TripleQuotes::None,
        raw_strings: false,
        char_literals: false,
        transpose_quote: false,
    }
}

const DOUBLE: &[StringRule] = &[string('"', false)];
const DOUBLE_MULTILINE: &[StringRule] = &[string('"', true)];
const QUOTES: &[StringRule] = &[string('"', false), string('\'', false)];
const QUOTES_MULTILINE: &[StringRule] = &[string('"', true), string('\'', true)];
const JS_STRINGS: &[StringRule] = &[string('"', false), string('\'', false), string('`', true)];
const GO_STRINGS: &[StringRule] = &[string('"', false), string('`', true)];
const SQL_STRINGS: &[StringRule] = &[string('\'', true), string('"', false)];

const PHP_LINES: &[LineRule] = &[
    line("//", Single),
    unless_next_line(line("#", Single), &['[']),
];
const SCSS_LINES: &[LineRule] = &[unless_next_line(line("///", Doc), &['/']), line("//", Single)];
const PLAIN_HASH_LINES: &[LineRule] = &[line("#", Single)];
const SHELL_LINES: &[LineRule] = &[at_boundary(line("#", Single))];
const YAML_LINES: &[LineRule] = &[at_boundary(line("#", Generic))];
const INI_LINES: &[LineRule] = &[
    at_boundary(line("#", Generic)),
    at_boundary(line(";", Generic)),
];
const DASH_LINES: &[LineRule] = &[line("--", Single)];
const HASKELL_LINES: &[LineRule] = &[line("-- |", Doc), line("-- ^", Doc), line("--", Single)];
const SEMICOLON_LINES: &[LineRule] = &[line(";", Single)];
const PERCENT_LINES: &[LineRule] = &[line("%", Single)];

const RUBY_BLOCKS: &[BlockRule] = &[block("=begin", "=end", Multi)];
const SQL_BLOCKS: &[BlockRule] = &[block("/*", "*/", Multi)];
const LUA_BLOCKS: &[BlockRule] = &[block("--[[", "]]", Multi)];
const HASKELL_BLOCKS: &[BlockRule] = &[
    nested(block("{-|", "-}", Doc), "{-"),
    nested(unless_next_block(block("{-", "-}", Multi), &['#']), "{-"),
];
const MARKUP_BLOCKS: &[BlockRule] = &[block("<!--", "-->", Generic)];
const MATLAB_BLOCKS: &[BlockRule] = &[block("%{", "%}", Multi)];

static C_SYNTAX: Syntax = Syntax {
    char_literals: true,
    ..syntax(SLASH_LINES, SLASH_BLOCKS, DOUBLE)
};

static JAVA_SYNTAX: Syntax = Syntax {
    char_literals: true,
    triple_quotes: TripleQuotes::Strings,
    ..syntax(SLASH_LINES, SLASH_BLOCKS, DOUBLE)
};

static JS_SYNTAX: Syntax = syntax(SLASH_LINES, SLASH_BLOCKS, JS_STRINGS);

static GO_SYNTAX: Syntax = Syntax {
    char_literals: true,
    ..syntax(SLASH_LINES, SLASH_BLOCKS, GO_STRINGS)
};

static RUST_SYNTAX: Syntax = Syntax {
    raw_strings: true,
    char_literals: true,
    ..syntax(SLASH_LINES, NESTED_SLASH_BLOCKS, DOUBLE_MULTILINE)
};

static SWIFT_SYNTAX: Syntax = Syntax {
    triple_quotes: TripleQuotes::Strings,
    ..syntax(SLASH_LINES, NESTED_SLASH_BLOCKS, DOUBLE)
};

static KOTLIN_SYNTAX: Syntax = Syntax {
    triple_quotes: TripleQuotes::Strings,
    char_literals: true,
    ..syntax(SLASH_LINES, NESTED_SLASH_BLOCKS, DOUBLE)
};

static PHP_SYNTAX: Syntax = syntax(PHP_LINES, SLASH_BLOCKS, QUOTES_MULTILINE);

static CSS_SYNTAX: Syntax = syntax(&[], SLASH_BLOCKS, QUOTES);

static SCSS_SYNTAX: Syntax = syntax(SCSS_LINES, SLASH_BLOCKS, QUOTES);

static PYTHON_SYNTAX: Syntax = Syntax {
    triple_quotes: TripleQuotes::Docstrings,
    ..syntax(PLAIN_HASH_LINES, &[], QUOTES)
};

static RUBY_SYNTAX: Syntax = syntax(PLAIN_HASH_LINES, RUBY_BLOCKS, QUOTES_MULTILINE);

static SHELL_SYNTAX: Syntax = syntax(SHELL_LINES, &[], QUOTES_MULTILINE);

static HASH_SYNTAX: Syntax = syntax(HASH_LINES, &[], QUOTES);

static YAML_SYNTAX: Syntax = syntax(YAML_LINES, &[], QUOTES);

static TOML_SYNTAX: Syntax = Syntax {
    triple_quotes: TripleQuotes::Strings,
    ..syntax(HASH_LINES, &[], QUOTES)
};

static INI_SYNTAX: Syntax = syntax(INI_LINES, &[], DOUBLE);

static SQL_SYNTAX: Syntax = syntax(DASH_LINES, SQL_BLOCKS, SQL_STRINGS);

static LUA_SYNTAX: Syntax = syntax(DASH_LINES, LUA_BLOCKS, QUOTES);

static HASKELL_SYNTAX: Syntax = Syntax {
    char_literals: true,
    ..syntax(HASKELL_LINES, HASKELL_BLOCKS, DOUBLE)
};

static MARKUP_SYNTAX: Syntax = syntax(&[], MARKUP_BLOCKS, &[]);

static ASM_SYNTAX: Syntax = syntax(SEMICOLON_LINES, &[], QUOTES);

static MATLAB_SYNTAX: Syntax = Syntax {
    transpose_quote: true,
    ..syntax(PERCENT_LINES, MATLAB_BLOCKS, QUOTES)
};

static JSON_SYNTAX: Syntax = syntax(&[], &[], DOUBLE);
