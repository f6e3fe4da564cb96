use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Default configuration filename when none is given.
const DEF_FILENAME: &str = "config.hcl";

#[derive(Debug, FromMeta)]
struct ConfigArgs {
    #[darling(default)]
    version: Option<usize>,
    #[darling(default)]
    filename: Option<String>,
}

/// Add a `version: usize` field to any given `struct` and implement both the `Versioned`
/// and `IntoConfig` traits for it.
///
/// ```ignore
/// #[into_configfile(version = 2, filename = "trackctl.hcl")]
/// #[derive(Debug, Default, Deserialize)]
/// struct Foo {
///     name: String,
/// }
/// ```
///
/// Both traits must be in scope where the macro is used.
///
#[proc_macro_attribute]
pub fn into_configfile(args: TokenStream, input: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(args.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(darling::Error::from(e).write_errors()),
    };
    let args = match ConfigArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let mut input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident.clone();

    let version = args.version.unwrap_or(1);
    let filename = args.filename.unwrap_or_else(|| DEF_FILENAME.to_string());

    match input.data {
        Data::Struct(ref mut data_struct) => match &mut data_struct.fields {
            Fields::Named(fields) => {
                let field = match syn::Field::parse_named.parse2(quote! { pub version: usize }) {
                    Ok(field) => field,
                    Err(e) => return e.to_compile_error().into(),
                };
                fields.named.push(field);
            }
            _ => {
                return syn::Error::new_spanned(
                    &ident,
                    "#[into_configfile] is only for struct with named fields",
                )
                .to_compile_error()
                .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&ident, "#[into_configfile] is only for struct")
                .to_compile_error()
                .into()
        }
    }

    let output = quote! {
        #input

        impl Versioned for #ident {
            fn version(&self) -> usize {
                self.version
            }
        }

        impl IntoConfig for #ident {
            const VERSION: usize = #version;
            const FILENAME: &'static str = #filename;
        }
    };
    output.into()
}
