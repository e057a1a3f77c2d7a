//! Derive macro for verdict validation schemas
//!
//! Expands `#[derive(Validatable)]` with `#[rule(...)]` field attributes into
//! a plain `impl Validatable` over the public schema builder; the derive adds
//! no semantics of its own.
//!
//! ```rust,ignore
//! use serde::Deserialize;
//! use verdict::prelude::*;
//!
//! #[derive(Validatable, Deserialize)]
//! #[validatable(message = "Registration failed")]
//! struct RegisterDto {
//!     #[rule(required, email)]
//!     email: Option<String>,
//!     #[rule(min_length(8))]
//!     password: Option<String>,
//!     #[rule(optional, min_length(2, message = "Name must be at least 2 chars"))]
//!     name: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Expr, Fields, Ident, LitStr, Token, parse_macro_input};

#[proc_macro_derive(Validatable, attributes(validatable, rule))]
pub fn derive_validatable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Validatable cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Validatable requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Validatable can only be derived for structs",
            ));
        }
    };

    let container = ContainerOptions::from_attrs(input)?;
    let schema_name = container.name.unwrap_or_else(|| ident.to_string());
    let message = container
        .message
        .map(|message| quote! { .message(#message) });

    let mut field_tokens = Vec::new();
    for field in fields {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();

        let mut calls = Vec::new();
        for attr in &field.attrs {
            if !attr.path().is_ident("rule") {
                continue;
            }
            let specs =
                attr.parse_args_with(Punctuated::<RuleSpec, Token![,]>::parse_terminated)?;
            for spec in specs {
                calls.push(spec.expand()?);
            }
        }

        // Fields without #[rule] attributes still join the schema and follow
        // the implicit disposition
        field_tokens.push(quote! {
            .field(::verdict::FieldBuilder::new(#field_name) #(#calls)*)
        });
    }

    Ok(quote! {
        impl ::verdict::Validatable for #ident {
            fn schema() -> ::std::result::Result<::verdict::Schema, ::verdict::ConfigurationError> {
                ::verdict::Schema::builder(#schema_name)
                    #message
                    #(#field_tokens)*
                    .build()
            }
        }
    })
}

struct ContainerOptions {
    message: Option<String>,
    name: Option<String>,
}

impl ContainerOptions {
    fn from_attrs(input: &DeriveInput) -> syn::Result<Self> {
        let mut options = Self {
            message: None,
            name: None,
        };
        for attr in &input.attrs {
            if !attr.path().is_ident("validatable") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("message") {
                    options.message = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("name") {
                    options.name = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `message = \"...\"` or `name = \"...\"`"))
                }
            })?;
        }
        Ok(options)
    }
}

/// One rule spec inside `#[rule(...)]`: an identifier with optional
/// parenthesized arguments, e.g. `required`, `min_length(8)`,
/// `one_of("a", "b", message = "...")`.
struct RuleSpec {
    name: Ident,
    positional: Vec<Expr>,
    message: Option<LitStr>,
}

impl Parse for RuleSpec {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;
        let mut positional = Vec::new();
        let mut message = None;

        if input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            while !content.is_empty() {
                if content.peek(Ident) && content.peek2(Token![=]) {
                    let option: Ident = content.parse()?;
                    content.parse::<Token![=]>()?;
                    if option == "message" {
                        message = Some(content.parse::<LitStr>()?);
                    } else {
                        return Err(syn::Error::new(
                            option.span(),
                            format!("unknown rule option `{option}`"),
                        ));
                    }
                } else {
                    positional.push(content.parse::<Expr>()?);
                }
                if !content.is_empty() {
                    content.parse::<Token![,]>()?;
                }
            }
        }

        Ok(Self {
            name,
            positional,
            message,
        })
    }
}

impl RuleSpec {
    fn expand(&self) -> syn::Result<TokenStream2> {
        let name = self.name.to_string();

        if name == "default" {
            let value = self.arg(0, 1)?;
            if self.message.is_some() {
                return Err(self.error("`default` does not take a message"));
            }
            return Ok(quote! { .default_value(::verdict::serde_json::json!(#value)) });
        }

        let rule = match name.as_str() {
            "required" => {
                self.no_args()?;
                quote! { ::verdict::Rule::required() }
            }
            "required_if" => {
                let field = self.arg(0, 2)?;
                let value = self.arg(1, 2)?;
                quote! { ::verdict::Rule::required_if(#field, ::verdict::serde_json::json!(#value)) }
            }
            "optional" => {
                self.no_args()?;
                if self.message.is_some() {
                    return Err(self.error("`optional` does not take a message"));
                }
                quote! { ::verdict::Rule::optional() }
            }
            "email" => self.bare(quote! { email })?,
            "url" => self.bare(quote! { url })?,
            "uuid" => self.bare(quote! { uuid })?,
            "boolean" => self.bare(quote! { boolean })?,
            "numeric" => self.bare(quote! { numeric })?,
            "date" => self.bare(quote! { date })?,
            "timestamp" => self.bare(quote! { timestamp })?,
            "json" => self.bare(quote! { json })?,
            "is_array" => self.bare(quote! { is_array })?,
            "alpha" => self.bare(quote! { alpha })?,
            "alpha_num" => self.bare(quote! { alpha_num })?,
            "lowercase" => self.bare(quote! { lowercase })?,
            "uppercase" => self.bare(quote! { uppercase })?,
            "ip" => self.bare(quote! { ip })?,
            "phone" => self.bare(quote! { phone })?,
            "min_length" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::min_length(#value) }
            }
            "max_length" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::max_length(#value) }
            }
            "length" => {
                let min = self.arg(0, 2)?;
                let max = self.arg(1, 2)?;
                quote! { ::verdict::Rule::length(#min, #max) }
            }
            "min" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::min((#value) as f64) }
            }
            "max" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::max((#value) as f64) }
            }
            "between" => {
                let min = self.arg(0, 2)?;
                let max = self.arg(1, 2)?;
                quote! { ::verdict::Rule::between((#min) as f64, (#max) as f64) }
            }
            "min_items" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::min_items(#value) }
            }
            "max_items" => {
                let value = self.arg(0, 1)?;
                quote! { ::verdict::Rule::max_items(#value) }
            }
            "regex" => {
                let pattern = self.arg(0, 1)?;
                quote! { ::verdict::Rule::regex(#pattern)? }
            }
            "one_of" => {
                if self.positional.is_empty() {
                    return Err(self.error("`one_of` needs at least one value"));
                }
                let values = &self.positional;
                quote! {
                    ::verdict::Rule::one_of(vec![#(::verdict::serde_json::json!(#values)),*])
                }
            }
            "allowed_characters" => {
                let characters = self.arg(0, usize::MAX)?;
                match self.positional.len() {
                    1 => quote! { ::verdict::Rule::allowed_characters(#characters, None) },
                    2 => {
                        let limit = &self.positional[1];
                        quote! {
                            ::verdict::Rule::allowed_characters(#characters, Some(#limit))
                        }
                    }
                    n => {
                        return Err(self.error(&format!(
                            "`allowed_characters` takes 1 or 2 arguments, got {n}"
                        )));
                    }
                }
            }
            "nested" => {
                let target = self.arg(0, 1)?;
                quote! { ::verdict::Rule::nested::<#target>() }
            }
            "nested_each" => {
                let target = self.arg(0, 1)?;
                quote! { ::verdict::Rule::nested_each::<#target>() }
            }
            other => {
                return Err(self.error(&format!("unknown rule `{other}`")));
            }
        };

        Ok(match &self.message {
            Some(message) => quote! { .rule(#rule.with_message(#message)) },
            None => quote! { .rule(#rule) },
        })
    }

    fn bare(&self, method: TokenStream2) -> syn::Result<TokenStream2> {
        self.no_args()?;
        Ok(quote! { ::verdict::Rule::#method() })
    }

    fn no_args(&self) -> syn::Result<()> {
        if self.positional.is_empty() {
            Ok(())
        } else {
            Err(self.error(&format!("`{}` takes no arguments", self.name)))
        }
    }

    fn arg(&self, index: usize, expected: usize) -> syn::Result<&Expr> {
        if expected != usize::MAX && self.positional.len() != expected {
            return Err(self.error(&format!(
                "`{}` takes {expected} argument(s), got {}",
                self.name,
                self.positional.len()
            )));
        }
        self.positional
            .get(index)
            .ok_or_else(|| self.error(&format!("`{}` is missing an argument", self.name)))
    }

    fn error(&self, message: &str) -> syn::Error {
        syn::Error::new(self.name.span(), message)
    }
}
