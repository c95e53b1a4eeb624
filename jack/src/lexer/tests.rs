use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_keyword_and_identifier() {
    let k = kinds("class Main\n");
    assert_eq!(
        k,
        vec![
            TokenKind::Keyword(Keyword::Class),
            TokenKind::Identifier("Main".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_all_nineteen_symbols_without_error() {
    let source: String = SYMBOLS.iter().collect();
    let result = tokenize(&source);
    assert!(result.errors.is_empty());
    assert_eq!(result.tokens.len(), SYMBOLS.len() + 1); // + Eof
}

#[test]
fn tokenizes_integer_constant_at_the_boundary() {
    let k = kinds("32767");
    assert_eq!(k, vec![TokenKind::IntegerConstant(32767), TokenKind::Eof]);
}

#[test]
fn integer_constant_over_the_boundary_is_an_error() {
    let result = tokenize("32768");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::IntegerOutOfRange);
}

#[test]
fn tokenizes_string_constant_stripping_quotes() {
    let k = kinds("\"hello world\"");
    assert_eq!(k, vec![TokenKind::StringConstant("hello world".into()), TokenKind::Eof]);
}

#[test]
fn unterminated_string_is_an_error() {
    let result = tokenize("\"hello\nworld\"");
    assert_eq!(result.errors[0].kind, ErrorKind::UnterminatedString);
}

#[test]
fn strips_line_comments() {
    let k = kinds("let x = 1; // assign x\n");
    assert!(!k.contains(&TokenKind::Identifier("assign".into())));
}

#[test]
fn strips_block_comments_spanning_multiple_lines() {
    let k = kinds("/* a\nb\nc */ let");
    assert_eq!(k, vec![TokenKind::Keyword(Keyword::Let), TokenKind::Eof]);
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let result = tokenize("/* never closes");
    assert_eq!(result.errors[0].kind, ErrorKind::UnterminatedBlockComment);
}

#[test]
fn distinguishes_keywords_from_identifiers_with_shared_prefix() {
    let k = kinds("this thisValue");
    assert_eq!(
        k,
        vec![
            TokenKind::Keyword(Keyword::This),
            TokenKind::Identifier("thisValue".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn round_trip_on_pure_tokenization_preserves_token_values() {
    // Invariant 6: re-serializing the token stream preserves the sequence
    // for whitespace-normalized source.
    let source = "let x = 1 + 2 ;";
    let values: Vec<String> = tokenize(source)
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| match t.kind {
            TokenKind::Keyword(k) => k.as_str().to_string(),
            TokenKind::Symbol(c) => c.to_string(),
            TokenKind::IntegerConstant(n) => n.to_string(),
            TokenKind::Identifier(s) => s,
            TokenKind::StringConstant(s) => s,
            TokenKind::Eof => unreachable!(),
        })
        .collect();
    assert_eq!(values.join(" "), source);
}
