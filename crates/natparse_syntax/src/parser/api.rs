/// Parse a token stream into a [`ParsedModule`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `natparse_syntax::lexer`. A missing trailing `Eof` is supplied.
/// - `options`: Module kind and reporting switches.
/// - `index`: Project index used to resolve `USING`, calls and function references. `None` disables module-level
///   unresolved diagnostics.
///
/// ## Notes
/// Parsing never fails as a whole; syntax errors and unresolved references are reported in
/// [`ParsedModule::diagnostics`].
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse<'a>(tokens: &'a [Token], options: &ParseOptions, index: Option<&'a dyn ModuleIndex>) -> ParsedModule {
    if matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
        return Parser::new(tokens, *options, index).parse();
    }
    let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
    let mut owned = tokens.to_vec();
    owned.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));
    Parser::new(&owned, *options, index).parse()
}
