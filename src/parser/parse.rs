//! Recursive-descent parser for the model language.
//!
//! Grammar surface:
//!
//! ```text
//! namespace <dotted-name>
//! import <fqn> | import <namespace>.*
//! enum Name { o LITERAL ... }
//! [abstract] asset|participant|transaction|concept Name
//!     [extends Parent] [identified by field] { <field>* }
//! o Type[[]] name [regex=/pat/] [range=[lo,hi]] [default=...] [optional]
//! --> Type[[]] name [optional]
//! ```
//!
//! Parsing is a pure single pass over one text: no I/O, no knowledge of
//! other model files. Any malformed input produces a [`SyntaxError`] with
//! the offending line/column and what was expected there.

use super::ast::{
    is_numeric_primitive, is_primitive, ClassDef, ClassKind, Declaration, EnumDef, FieldDef,
    Import, Literal, RangeBounds,
};
use super::error::SyntaxError;
use super::lexer::{Lexer, Spanned, Token};
use crate::model::ModelFile;

/// Parses one model file. `source_label` tags every error (and the returned
/// file) for diagnostics; it is usually the file name.
pub fn parse(text: &str, source_label: &str) -> Result<ModelFile, SyntaxError> {
    Parser::new(text, source_label).parse_model_file()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanned>,
    label: &'a str,
    text: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, label: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text, label),
            peeked: None,
            label,
            text,
        }
    }

    fn parse_model_file(mut self) -> Result<ModelFile, SyntaxError> {
        self.expect_word("namespace")?;
        let (namespace, ..) = self.take_dotted_name("a namespace name")?;

        let mut imports = Vec::new();
        while self.at_word("import") {
            self.advance()?;
            imports.push(self.parse_import()?);
        }

        let mut declarations = Vec::new();
        loop {
            let spanned = self.peek()?.clone();
            match &spanned.token {
                Token::Eof => break,
                Token::Ident(word) if word == "enum" => {
                    self.advance()?;
                    declarations.push(Declaration::Enum(self.parse_enum(spanned.line)?));
                }
                Token::Ident(word) if word == "abstract" || class_kind(word).is_some() => {
                    declarations.push(Declaration::Class(self.parse_class()?));
                }
                other => {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!(
                            "expected 'enum', 'abstract', 'asset', 'participant', \
                             'transaction' or 'concept', found {}",
                            other.describe()
                        ),
                    ));
                }
            }
        }

        Ok(ModelFile::new(
            namespace,
            imports,
            declarations,
            self.label,
            self.text,
        ))
    }

    /// `import a.b.C` or `import a.b.*` — at least one dot is required,
    /// since a bare name has no namespace to import from.
    fn parse_import(&mut self) -> Result<Import, SyntaxError> {
        let (first, line, column) = self.take_ident("an imported type or namespace")?;
        let mut segments = vec![first];
        let mut wildcard = false;
        while self.at_token(&Token::Dot) {
            self.advance()?;
            if self.at_token(&Token::Star) {
                self.advance()?;
                wildcard = true;
                break;
            }
            let (segment, ..) = self.take_ident("a name segment after '.'")?;
            segments.push(segment);
        }
        if segments.len() < 2 && !wildcard {
            return Err(self.err(
                line,
                column,
                "an import must reference a fully-qualified type or a namespace wildcard",
            ));
        }
        let name = segments.join(".");
        Ok(if wildcard {
            Import::Namespace(name)
        } else {
            Import::Type(name)
        })
    }

    fn parse_enum(&mut self, line: u32) -> Result<EnumDef, SyntaxError> {
        let (name, ..) = self.take_ident("an enum name")?;
        self.expect_token(Token::LBrace)?;
        let mut literals = Vec::new();
        loop {
            let spanned = self.peek()?.clone();
            match &spanned.token {
                Token::RBrace => {
                    self.advance()?;
                    break;
                }
                Token::Ident(word) if word == "o" => {
                    self.advance()?;
                    let (literal, ..) = self.take_ident("an enum literal name")?;
                    literals.push(literal);
                }
                other => {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!("expected 'o <LITERAL>' or '}}', found {}", other.describe()),
                    ));
                }
            }
        }
        Ok(EnumDef {
            name,
            literals,
            line,
        })
    }

    fn parse_class(&mut self) -> Result<ClassDef, SyntaxError> {
        let mut is_abstract = false;
        let spanned = self.advance()?;
        let line = spanned.line;
        let (mut kind_word, mut kw_line, mut kw_column) = match spanned.token {
            Token::Ident(word) => (word, spanned.line, spanned.column),
            other => {
                return Err(self.err(
                    spanned.line,
                    spanned.column,
                    format!("expected a declaration keyword, found {}", other.describe()),
                ))
            }
        };
        if kind_word == "abstract" {
            is_abstract = true;
            (kind_word, kw_line, kw_column) = self.take_ident("a declaration kind")?;
        }
        let Some(kind) = class_kind(&kind_word) else {
            return Err(self.err(
                kw_line,
                kw_column,
                format!(
                    "expected 'asset', 'participant', 'transaction' or 'concept', \
                     found '{kind_word}'"
                ),
            ));
        };
        let (name, ..) = self.take_ident("a declaration name")?;

        // `extends` and `identified by` may appear in either order, once each.
        let mut extends = None;
        let mut identified_by = None;
        loop {
            if self.at_word("extends") {
                let spanned = self.advance()?;
                if extends.is_some() {
                    return Err(self.err(spanned.line, spanned.column, "duplicate 'extends' clause"));
                }
                let (parent, ..) = self.take_dotted_name("a supertype name after 'extends'")?;
                extends = Some(parent);
            } else if self.at_word("identified") {
                let spanned = self.advance()?;
                if identified_by.is_some() {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        "duplicate 'identified by' clause",
                    ));
                }
                if !kind.is_identifiable() {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!(
                            "'identified by' is not allowed on a {} declaration",
                            kind.keyword()
                        ),
                    ));
                }
                self.expect_word("by")?;
                let (field, ..) = self.take_ident("an identifying field name")?;
                identified_by = Some(field);
            } else {
                break;
            }
        }

        self.expect_token(Token::LBrace)?;
        let mut fields = Vec::new();
        loop {
            let spanned = self.peek()?.clone();
            match &spanned.token {
                Token::RBrace => {
                    self.advance()?;
                    break;
                }
                Token::Ident(word) if word == "o" => {
                    self.advance()?;
                    fields.push(self.parse_scalar_field(spanned.line)?);
                }
                Token::Arrow => {
                    self.advance()?;
                    fields.push(self.parse_relation_field(spanned.line)?);
                }
                other => {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!(
                            "expected a field ('o ...' or '--> ...') or '}}', found {}",
                            other.describe()
                        ),
                    ));
                }
            }
        }

        Ok(ClassDef {
            name,
            kind,
            is_abstract,
            extends,
            identified_by,
            fields,
            line,
        })
    }

    /// `o Type[[]] name [regex=/.../] [range=[lo,hi]] [default=...] [optional]`
    fn parse_scalar_field(&mut self, line: u32) -> Result<FieldDef, SyntaxError> {
        let (type_name, ..) = self.take_dotted_name("a field type")?;
        let array = self.take_array_marker()?;
        let (name, ..) = self.take_ident("a field name")?;

        let mut field = FieldDef {
            name,
            type_name,
            relation: false,
            array,
            optional: false,
            default: None,
            regex: None,
            range: None,
            line,
        };

        loop {
            if self.at_word("regex") {
                let spanned = self.advance()?;
                if field.regex.is_some() {
                    return Err(self.err(spanned.line, spanned.column, "duplicate 'regex' validator"));
                }
                if field.type_name != "String" {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!(
                            "a regex validator applies only to String fields, \
                             but '{}' is {}",
                            field.name, field.type_name
                        ),
                    ));
                }
                self.expect_token(Token::Eq)?;
                // The peek buffer is empty here: '=' was just consumed, so
                // the lexer cursor sits exactly on the '/' of the literal.
                let (pattern, ..) = self.lexer.scan_regex_literal()?;
                field.regex = Some(pattern);
            } else if self.at_word("range") {
                let spanned = self.advance()?;
                if field.range.is_some() {
                    return Err(self.err(spanned.line, spanned.column, "duplicate 'range' validator"));
                }
                if !is_numeric_primitive(&field.type_name) {
                    return Err(self.err(
                        spanned.line,
                        spanned.column,
                        format!(
                            "a range validator applies only to Integer, Long or Double \
                             fields, but '{}' is {}",
                            field.name, field.type_name
                        ),
                    ));
                }
                self.expect_token(Token::Eq)?;
                field.range = Some(self.parse_range(spanned.line, spanned.column)?);
            } else if self.at_word("default") {
                let spanned = self.advance()?;
                if field.default.is_some() {
                    return Err(self.err(spanned.line, spanned.column, "duplicate 'default' clause"));
                }
                self.expect_token(Token::Eq)?;
                field.default = Some(self.parse_literal()?);
            } else if self.at_word("optional") {
                let spanned = self.advance()?;
                if field.optional {
                    return Err(self.err(spanned.line, spanned.column, "duplicate 'optional' marker"));
                }
                field.optional = true;
            } else {
                break;
            }
        }

        Ok(field)
    }

    /// `--> Type[[]] name [optional]`
    fn parse_relation_field(&mut self, line: u32) -> Result<FieldDef, SyntaxError> {
        let (type_name, type_line, type_column) =
            self.take_dotted_name("a relationship target type")?;
        if is_primitive(&type_name) {
            return Err(self.err(
                type_line,
                type_column,
                format!("a relationship target must be a declared type, not {type_name}"),
            ));
        }
        let array = self.take_array_marker()?;
        let (name, ..) = self.take_ident("a field name")?;
        let mut optional = false;
        if self.at_word("optional") {
            self.advance()?;
            optional = true;
        }
        Ok(FieldDef {
            name,
            type_name,
            relation: true,
            array,
            optional,
            default: None,
            regex: None,
            range: None,
            line,
        })
    }

    /// `[lo,hi]` with either endpoint omittable; both omitted is an error.
    fn parse_range(&mut self, line: u32, column: u32) -> Result<RangeBounds, SyntaxError> {
        self.expect_token(Token::LBracket)?;
        let lower = self.take_optional_number()?;
        self.expect_token(Token::Comma)?;
        let upper = self.take_optional_number()?;
        self.expect_token(Token::RBracket)?;
        if lower.is_none() && upper.is_none() {
            return Err(self.err(line, column, "a range must constrain at least one bound"));
        }
        Ok(RangeBounds { lower, upper })
    }

    fn take_optional_number(&mut self) -> Result<Option<f64>, SyntaxError> {
        match &self.peek()?.token {
            Token::Int(n) => {
                let value = *n as f64;
                self.advance()?;
                Ok(Some(value))
            }
            Token::Float(f) => {
                let value = *f;
                self.advance()?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let spanned = self.advance()?;
        match spanned.token {
            Token::Str(s) => Ok(Literal::Str(s)),
            Token::Int(n) => Ok(Literal::Int(n)),
            Token::Float(f) => Ok(Literal::Float(f)),
            Token::Ident(word) if word == "true" => Ok(Literal::Bool(true)),
            Token::Ident(word) if word == "false" => Ok(Literal::Bool(false)),
            Token::Ident(word) => Ok(Literal::Ident(word)),
            other => Err(self.err(
                spanned.line,
                spanned.column,
                format!("expected a default value, found {}", other.describe()),
            )),
        }
    }

    fn take_array_marker(&mut self) -> Result<bool, SyntaxError> {
        if self.at_token(&Token::LBracket) {
            self.advance()?;
            self.expect_token(Token::RBracket)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // --- Token helpers ---

    fn peek(&mut self) -> Result<&Spanned, SyntaxError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().expect("peek buffer just filled"))
    }

    fn advance(&mut self) -> Result<Spanned, SyntaxError> {
        match self.peeked.take() {
            Some(spanned) => Ok(spanned),
            None => self.lexer.next_token(),
        }
    }

    fn at_token(&mut self, token: &Token) -> bool {
        matches!(self.peek(), Ok(spanned) if spanned.token == *token)
    }

    fn at_word(&mut self, word: &str) -> bool {
        matches!(self.peek(), Ok(spanned) if matches!(&spanned.token, Token::Ident(w) if w == word))
    }

    fn take_ident(&mut self, what: &str) -> Result<(String, u32, u32), SyntaxError> {
        let spanned = self.advance()?;
        match spanned.token {
            Token::Ident(word) => Ok((word, spanned.line, spanned.column)),
            other => Err(self.err(
                spanned.line,
                spanned.column,
                format!("expected {what}, found {}", other.describe()),
            )),
        }
    }

    /// `ident ('.' ident)*` — used for namespaces and type references.
    fn take_dotted_name(&mut self, what: &str) -> Result<(String, u32, u32), SyntaxError> {
        let (first, line, column) = self.take_ident(what)?;
        let mut name = first;
        while self.at_token(&Token::Dot) {
            self.advance()?;
            let (segment, ..) = self.take_ident("a name segment after '.'")?;
            name.push('.');
            name.push_str(&segment);
        }
        Ok((name, line, column))
    }

    fn expect_word(&mut self, word: &str) -> Result<(), SyntaxError> {
        let spanned = self.advance()?;
        match &spanned.token {
            Token::Ident(w) if w == word => Ok(()),
            other => Err(self.err(
                spanned.line,
                spanned.column,
                format!("expected '{word}', found {}", other.describe()),
            )),
        }
    }

    fn expect_token(&mut self, token: Token) -> Result<(), SyntaxError> {
        let spanned = self.advance()?;
        if spanned.token == token {
            Ok(())
        } else {
            Err(self.err(
                spanned.line,
                spanned.column,
                format!(
                    "expected {}, found {}",
                    token.describe(),
                    spanned.token.describe()
                ),
            ))
        }
    }

    fn err(&self, line: u32, column: u32, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.label, line, column, message)
    }
}

fn class_kind(word: &str) -> Option<ClassKind> {
    match word {
        "asset" => Some(ClassKind::Asset),
        "participant" => Some(ClassKind::Participant),
        "transaction" => Some(ClassKind::Transaction),
        "concept" => Some(ClassKind::Concept),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_ok(text: &str) -> ModelFile {
        parse(text, "test.msl").expect("parse failure")
    }

    fn parse_err(text: &str) -> SyntaxError {
        parse(text, "test.msl").expect_err("expected a syntax error")
    }

    fn class(file: &ModelFile, index: usize) -> &ClassDef {
        match &file.declarations[index] {
            Declaration::Class(c) => c,
            Declaration::Enum(e) => panic!("expected a class, found enum '{}'", e.name),
        }
    }

    #[test]
    fn parses_namespace_and_imports() {
        let file = parse_ok(
            "namespace org.acme.vehicle\n\
             import org.acme.registry.Registrar\n\
             import org.acme.base.*\n",
        );
        assert_eq!(file.namespace, "org.acme.vehicle");
        assert_eq!(
            file.imports,
            vec![
                Import::Type("org.acme.registry.Registrar".into()),
                Import::Namespace("org.acme.base".into()),
            ]
        );
        assert!(file.declarations.is_empty());
    }

    #[test]
    fn parses_enum_declaration() {
        let file = parse_ok(
            "namespace org.acme\n\
             enum VehicleStatus {\n\
               o CREATED\n\
               o REGISTERED\n\
               o SOLD\n\
             }\n",
        );
        match &file.declarations[0] {
            Declaration::Enum(e) => {
                assert_eq!(e.name, "VehicleStatus");
                assert_eq!(e.literals, vec!["CREATED", "REGISTERED", "SOLD"]);
            }
            other => panic!("expected enum, found {other:?}"),
        }
    }

    #[test]
    fn parses_class_with_fields_and_validators() {
        let file = parse_ok(
            "namespace org.acme\n\
             abstract asset Vehicle identified by vin {\n\
               o String vin regex=/^[A-HJ-NPR-Z\\d]{17}$/\n\
               o Integer modelYear range=[1990,]\n\
               o Double price range=[,200000] optional\n\
               o String[] nicknames optional\n\
               o Boolean insured default=false\n\
               --> org.acme.registry.Participant owner optional\n\
             }\n",
        );
        let vehicle = class(&file, 0);
        assert!(vehicle.is_abstract);
        assert_eq!(vehicle.kind, ClassKind::Asset);
        assert_eq!(vehicle.identified_by.as_deref(), Some("vin"));
        assert_eq!(vehicle.fields.len(), 6);

        let vin = &vehicle.fields[0];
        assert_eq!(vin.regex.as_deref(), Some("^[A-HJ-NPR-Z\\d]{17}$"));

        let year = &vehicle.fields[1];
        assert_eq!(year.range, Some(RangeBounds { lower: Some(1990.0), upper: None }));

        let price = &vehicle.fields[2];
        assert_eq!(price.range, Some(RangeBounds { lower: None, upper: Some(200000.0) }));
        assert!(price.optional);

        assert!(vehicle.fields[3].array);
        assert_eq!(vehicle.fields[4].default, Some(Literal::Bool(false)));

        let owner = &vehicle.fields[5];
        assert!(owner.relation);
        assert!(owner.optional);
        assert_eq!(owner.type_name, "org.acme.registry.Participant");
    }

    #[test]
    fn accepts_clauses_in_either_order() {
        let file = parse_ok(
            "namespace org.acme\n\
             abstract asset Base identified by id { o String id }\n\
             asset Car identified by plate extends Base { o String plate }\n\
             asset Van extends Base { }\n",
        );
        assert_eq!(class(&file, 1).extends.as_deref(), Some("Base"));
        assert_eq!(class(&file, 1).identified_by.as_deref(), Some("plate"));
        assert_eq!(class(&file, 2).extends.as_deref(), Some("Base"));
    }

    #[test]
    fn comments_are_discarded() {
        let file = parse_ok(
            "// vehicle domain\n\
             namespace org.acme /* trailing */\n\
             concept Address {\n\
               o String street // required by the registrar\n\
             }\n",
        );
        assert_eq!(class(&file, 0).fields.len(), 1);
    }

    #[rstest]
    #[case("asset Vehicle { }", 1, 1, "expected 'namespace'")]
    #[case("namespace org.acme\nimport Vehicle\n", 2, 8, "fully-qualified")]
    #[case(
        "namespace org.acme\ntransaction Sale identified by id { }",
        2,
        18,
        "not allowed on a transaction"
    )]
    #[case(
        "namespace org.acme\nasset V identified by vin { o Integer age regex=/x/ }",
        2,
        43,
        "applies only to String"
    )]
    #[case(
        "namespace org.acme\nasset V identified by vin { o String vin range=[1,2] }",
        2,
        42,
        "applies only to Integer, Long or Double"
    )]
    #[case(
        "namespace org.acme\nasset V identified by vin { o Integer age range=[,] }",
        2,
        43,
        "at least one bound"
    )]
    #[case(
        "namespace org.acme\nasset V identified by vin { --> String s }",
        2,
        33,
        "must be a declared type"
    )]
    #[case("namespace org.acme\nenum E { CREATED }", 2, 10, "expected 'o <LITERAL>'")]
    fn rejects_malformed_input(
        #[case] text: &str,
        #[case] line: u32,
        #[case] column: u32,
        #[case] fragment: &str,
    ) {
        let err = parse_err(text);
        assert_eq!((err.line, err.column), (line, column), "error: {err}");
        assert!(
            err.message.contains(fragment),
            "message '{}' should contain '{fragment}'",
            err.message
        );
        assert_eq!(err.source_label, "test.msl");
    }

    #[test]
    fn retains_source_text_and_label() {
        let text = "namespace org.acme\n";
        let file = parse_ok(text);
        assert_eq!(file.source, text);
        assert_eq!(file.source_label, "test.msl");
    }
}
