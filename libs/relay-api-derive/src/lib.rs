use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derive macro for plugin config parameter declarations.
///
/// Generates two methods on the annotated struct:
///
/// - `config_params() -> Vec<ConfigParam>` — parameter declarations for FFI export.
/// - `from_config(&ConfigValues) -> Result<Self, PluginError>` — reads typed values.
///
/// The struct must implement `Default` (defaults are used for non-required params).
///
/// # Example
///
/// ```ignore
/// #[derive(ConfigParams, Default)]
/// pub struct MyConfig {
///     #[param(context = "startup", description = "The remote topic.")]
///     pub topic: String,
///
///     #[param(context = "reload", required, description = "Batch size")]
///     pub batch: u64,
/// }
/// ```
///
/// Supported field types: `bool`, `i64`, `u64`, `usize`, `f64`, `String`.
#[proc_macro_derive(ConfigParams, attributes(param))]
pub fn derive_config_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Parsed `#[param(...)]` attribute.
struct ParamAttr {
    context: String,
    description: String,
    required: bool,
}

fn parse_param_attr(field_name: &Ident, attrs: &[syn::Attribute]) -> Result<ParamAttr, syn::Error> {
    let mut context: Option<String> = None;
    let mut description: Option<String> = None;
    let mut required = false;

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("context") {
                let value: LitStr = meta.value()?.parse()?;
                context = Some(value.value());
            } else if meta.path.is_ident("description") {
                let value: LitStr = meta.value()?.parse()?;
                description = Some(value.value());
            } else if meta.path.is_ident("required") {
                required = true;
            } else {
                return Err(meta.error("unknown #[param] key"));
            }
            Ok(())
        })?;
    }

    Ok(ParamAttr {
        context: context.ok_or_else(|| {
            syn::Error::new_spanned(field_name, "missing #[param(context = \"...\")]")
        })?,
        description: description.ok_or_else(|| {
            syn::Error::new_spanned(field_name, "missing #[param(description = \"...\")]")
        })?,
        required,
    })
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "ConfigParams only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "ConfigParams only supports structs",
            ))
        }
    };

    let mut config_param_tokens = Vec::new();
    let mut from_config_tokens = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.to_string();
        let attr = parse_param_attr(field_name, &field.attrs)?;

        let context_expr = match attr.context.as_str() {
            "startup" => quote! { relay_api::config::ParamContext::Startup },
            "reload" => quote! { relay_api::config::ParamContext::Reload },
            other => {
                return Err(syn::Error::new_spanned(
                    field_name,
                    format!("unknown context '{other}' (expected 'startup' or 'reload')"),
                ))
            }
        };

        let field_ty = &field.ty;
        let ty_name = type_ident_name(field_ty).ok_or_else(|| {
            syn::Error::new_spanned(field_ty, "unsupported type for ConfigParams")
        })?;

        // (ParamType, ParamValue variant, ConfigValues getter, conversion from getter output)
        let (param_type, variant, getter, convert) = match ty_name.as_str() {
            "u64" => (quote!(U64), quote!(U64), quote!(get_u64), quote!(v)),
            "usize" => (quote!(U64), quote!(U64), quote!(get_u64), quote!(v as usize)),
            "i64" => (quote!(I64), quote!(I64), quote!(get_i64), quote!(v)),
            "f64" => (quote!(F64), quote!(F64), quote!(get_f64), quote!(v)),
            "bool" => (quote!(Bool), quote!(Bool), quote!(get_bool), quote!(v)),
            "String" => (quote!(Str), quote!(Str), quote!(get_str), quote!(v.to_string())),
            _ => {
                return Err(syn::Error::new_spanned(
                    field_ty,
                    format!(
                        "unsupported type '{ty_name}' (expected u64, i64, f64, bool, String, usize)"
                    ),
                ))
            }
        };

        let default_value = if attr.required {
            quote! { None }
        } else {
            let default_inner = match ty_name.as_str() {
                "usize" => quote! { __defaults.#field_name as u64 },
                "String" => quote! { __defaults.#field_name.clone() },
                _ => quote! { __defaults.#field_name },
            };
            quote! { Some(relay_api::config::ParamValue::#variant(#default_inner)) }
        };

        let getter_expr = if attr.required {
            quote! {
                let v = __config.#getter(#field_name_str).ok_or_else(|| {
                    relay_api::error::PluginError::config(
                        format!("missing required parameter '{}'", #field_name_str)
                    )
                })?;
                result.#field_name = #convert;
            }
        } else {
            quote! {
                if let Some(v) = __config.#getter(#field_name_str) {
                    result.#field_name = #convert;
                }
            }
        };

        let required = attr.required;
        let description = &attr.description;
        config_param_tokens.push(quote! {
            relay_api::config::ConfigParam {
                name: #field_name_str.to_string(),
                param_type: relay_api::config::ParamType::#param_type,
                context: #context_expr,
                required: #required,
                default: #default_value,
                description: #description.to_string(),
            }
        });

        from_config_tokens.push(getter_expr);
    }

    Ok(quote! {
        impl #name {
            pub fn config_params() -> Vec<relay_api::config::ConfigParam> {
                let __defaults = Self::default();
                vec![
                    #(#config_param_tokens),*
                ]
            }

            pub fn from_config(
                __config: &relay_api::config::ConfigValues,
            ) -> Result<Self, relay_api::error::PluginError> {
                let mut result = Self::default();
                #(#from_config_tokens)*
                Ok(result)
            }
        }
    })
}

/// Extract the last path segment ident name from a type (e.g. `u64`, `String`).
fn type_ident_name(ty: &Type) -> Option<String> {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident.to_string())
    } else {
        None
    }
}
