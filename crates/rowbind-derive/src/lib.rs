//! `#[derive(Record)]` for rowbind.
//!
//! Field attributes carry the column metadata as raw strings, exactly as the
//! engine reads them at runtime:
//!
//! ```ignore
//! #[derive(Default, rowbind::Record)]
//! struct Reading {
//!     #[rowbind(column = "sensor")]
//!     sensor: String,
//!     #[rowbind(column = "raw", base = "16")]
//!     raw: u32,
//!     #[rowbind(column = "temp,omitempty", precision = "2")]
//!     temp: Option<f64>,
//!     #[rowbind(column = "-")]
//!     cached: bool,
//!     untracked: u8,
//! }
//! ```
//!
//! Fields without a `#[rowbind(...)]` attribute are not mapped. A field whose
//! attribute has no `column` maps to a column named after the field.
//!
//! Struct-level flags advertise whole-record and map hooks the type
//! implements by hand: `#[rowbind(unmarshal_row, marshal_row, unmarshal_map,
//! marshal_map)]`. Generated code refers to `::rowbind`; use
//! `#[rowbind(crate = "path")]` to point it elsewhere.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Error, Fields, LitStr, Path};

#[proc_macro_derive(Record, attributes(rowbind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Default)]
struct RecordOptions {
    krate: Option<Path>,
    unmarshal_row: bool,
    marshal_row: bool,
    unmarshal_map: bool,
    marshal_map: bool,
}

#[derive(Default)]
struct FieldOptions {
    column: Option<LitStr>,
    base: Option<LitStr>,
    precision: Option<LitStr>,
    format: Option<LitStr>,
}

fn is_rowbind(attr: &Attribute) -> bool {
    attr.path().is_ident("rowbind")
}

fn parse_record_options(attrs: &[Attribute]) -> Result<RecordOptions, Error> {
    let mut options = RecordOptions::default();
    for attr in attrs.iter().filter(|attr| is_rowbind(attr)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                options.krate = Some(lit.parse()?);
            } else if meta.path.is_ident("unmarshal_row") {
                options.unmarshal_row = true;
            } else if meta.path.is_ident("marshal_row") {
                options.marshal_row = true;
            } else if meta.path.is_ident("unmarshal_map") {
                options.unmarshal_map = true;
            } else if meta.path.is_ident("marshal_map") {
                options.marshal_map = true;
            } else {
                return Err(meta.error("unsupported rowbind record attribute"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// `None` when the field carries no rowbind attribute.
fn parse_field_options(attrs: &[Attribute]) -> Result<Option<FieldOptions>, Error> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| is_rowbind(attr)) {
        let options: &mut FieldOptions = found.get_or_insert_with(FieldOptions::default);
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("column") {
                &mut options.column
            } else if meta.path.is_ident("base") {
                &mut options.base
            } else if meta.path.is_ident("precision") {
                &mut options.precision
            } else if meta.path.is_ident("format") {
                &mut options.format
            } else {
                return Err(meta.error("unsupported rowbind field attribute"));
            };
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        })?;
    }
    Ok(found)
}

fn expand_record(input: DeriveInput) -> Result<TokenStream2, Error> {
    let record = parse_record_options(&input.attrs)?;
    let krate = record.krate.clone().unwrap_or_else(|| syn::parse_quote!(::rowbind));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new(
                    other.span(),
                    "#[derive(Record)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.ident.span(),
                "#[derive(Record)] only supports structs",
            ))
        }
    };

    let mut specs = Vec::new();
    let mut slot_arms = Vec::new();
    let mut view_arms = Vec::new();

    for field in fields {
        let Some(options) = parse_field_options(&field.attrs)? else {
            continue;
        };
        let Some(ident) = &field.ident else {
            continue;
        };

        let name = ident.unraw().to_string();
        let column = options
            .column
            .clone()
            .unwrap_or_else(|| LitStr::new(&name, ident.span()));
        let excluded = {
            let value = column.value();
            let head = value.split(',').next().unwrap_or_default();
            head.is_empty() || head == "-"
        };

        let mut spec = quote! { #krate::FieldSpec::new(#name, #column) };
        if let Some(base) = &options.base {
            spec = quote! { #spec.with_base(#base) };
        }
        if let Some(precision) = &options.precision {
            spec = quote! { #spec.with_precision(#precision) };
        }
        if let Some(format) = &options.format {
            spec = quote! { #spec.with_format(#format) };
        }

        let index = specs.len();
        specs.push(spec);

        // Excluded fields are never converted, so their types need not be `Field`.
        if excluded {
            continue;
        }
        slot_arms.push(quote! { #index => #krate::Field::slot(&mut self.#ident) });
        view_arms.push(quote! { #index => #krate::Field::view(&self.#ident) });
    }

    let hooks = hook_accessors(&record, &krate);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn fields() -> &'static [#krate::FieldSpec] {
                const FIELDS: &[#krate::FieldSpec] = &[#(#specs),*];
                FIELDS
            }

            fn field_mut(&mut self, index: usize) -> #krate::Slot<'_> {
                match index {
                    #(#slot_arms,)*
                    _ => #krate::Slot::Unsupported(::core::any::type_name::<Self>()),
                }
            }

            fn field(&self, index: usize) -> #krate::View<'_> {
                match index {
                    #(#view_arms,)*
                    _ => #krate::View::Unsupported(::core::any::type_name::<Self>()),
                }
            }

            #hooks
        }
    })
}

fn hook_accessors(record: &RecordOptions, krate: &Path) -> TokenStream2 {
    let mut tokens = TokenStream2::new();
    if record.unmarshal_row {
        tokens.extend(quote! {
            fn as_unmarshal_row(&mut self) -> ::core::option::Option<&mut dyn #krate::UnmarshalRow> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if record.unmarshal_map {
        tokens.extend(quote! {
            fn as_unmarshal_map(&mut self) -> ::core::option::Option<&mut dyn #krate::UnmarshalMap> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if record.marshal_row {
        tokens.extend(quote! {
            fn as_marshal_row(&self) -> ::core::option::Option<&dyn #krate::MarshalRow> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if record.marshal_map {
        tokens.extend(quote! {
            fn as_marshal_map(&self) -> ::core::option::Option<&dyn #krate::MarshalMap> {
                ::core::option::Option::Some(self)
            }
        });
    }
    tokens
}
