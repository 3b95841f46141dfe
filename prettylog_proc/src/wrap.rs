// SPDX-License-Identifier: MIT OR Apache-2.0
use proc_macro::{Delimiter, TokenStream, TokenTree};

pub fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({message:?});").parse().unwrap()
}

/// The name of the function in `item`, if `item` is a function.
pub fn fn_name(item: &[TokenTree]) -> Option<String> {
    item.windows(2).find_map(|pair| match pair {
        [TokenTree::Ident(keyword), TokenTree::Ident(name)] if keyword.to_string() == "fn" => {
            Some(name.to_string())
        }
        _ => None,
    })
}

/// Splits attribute arguments at top-level commas.  Empty arguments are dropped.
pub fn split_args(attr: TokenStream) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = TokenStream::new();
    for token in attr {
        match &token {
            TokenTree::Punct(punct) if punct.as_char() == ',' => {
                args.push(std::mem::take(&mut current));
            }
            _ => current.extend([token]),
        }
    }
    args.push(current);
    args.into_iter()
        .filter(|arg| !arg.is_empty())
        .map(|arg| arg.to_string())
        .collect()
}

/**
The logger expression for an attribute's arguments.

Nothing means the root logger, a string literal names a logger, anything else is an
expression evaluating to a `Logger` or `&Logger`.
*/
pub fn logger_expr(attr: TokenStream) -> Result<String, String> {
    let args = split_args(attr);
    match args.as_slice() {
        [] => Ok("&prettylog::Logger::root()".to_string()),
        [arg] if arg.starts_with('"') => Ok(format!("&prettylog::get_logger({arg})")),
        [arg] => Ok(format!("&({arg})")),
        _ => Err("expected at most one logger argument".to_string()),
    }
}

/**
Wraps the body of the function in `item` so that `guard` is held while it runs.

`guard` is an expression; `{fn_name}` in it is replaced by the function's name.
*/
pub fn wrap_body(attribute: &str, guard: &str, item: TokenStream) -> TokenStream {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let Some(fn_name) = fn_name(&tokens) else {
        return compile_error(&format!("#[{attribute}] can only be applied to functions"));
    };

    // the body is the last token of a function item
    let original_body = match tokens.last() {
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => group.stream(),
        _ => {
            return compile_error(&format!("#[{attribute}] requires a function with a body"));
        }
    };

    let guard = guard.replace("{fn_name}", &fn_name);
    let new_body_src = format!(
        r#"{{
            let _prettylog_guard = {guard};
            {{ {original_body} }}
        }}"#
    );

    let new_body: TokenStream = match new_body_src.parse() {
        Ok(body) => body,
        Err(_) => return compile_error(&format!("#[{attribute}]: invalid arguments")),
    };
    let last = tokens.len() - 1;
    tokens[last] = new_body.into_iter().next().unwrap();

    tokens.into_iter().collect()
}
