use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, parse_macro_input};

/// Derives `formgate::form::FormModel` for a struct with named fields,
/// generating a `{Model}Fields` accessor and a `{Model}{Field}Lens` per field.
#[proc_macro_derive(FormModel)]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let root = formgate_path();
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let mut lens_defs = Vec::new();
    let mut accessor_methods = Vec::new();
    for field in named_fields {
        if let Some((lens, accessor)) = expand_field(&root, &model_ident, field) {
            lens_defs.push(lens);
            accessor_methods.push(accessor);
        }
    }

    quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#accessor_methods)*
        }

        impl #root::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }
        }

        #(#lens_defs)*
    }
    .into()
}

fn expand_field(
    root: &TokenStream2,
    model_ident: &Ident,
    field: Field,
) -> Option<(TokenStream2, TokenStream2)> {
    let field_ident = field.ident?;
    let field_ty = field.ty;
    let field_name = field_ident.to_string();
    let lens_ident = format_ident!("{model_ident}{}Lens", to_pascal_case(&field_name));

    let lens = quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #lens_ident;

        impl #root::form::FieldLens<#model_ident> for #lens_ident {
            type Value = #field_ty;

            fn key(self) -> #root::form::FieldKey {
                #root::form::FieldKey::new(#field_name)
            }

            fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                &model.#field_ident
            }

            fn set(self, model: &mut #model_ident, value: Self::Value) {
                model.#field_ident = value;
            }
        }
    };

    let accessor = quote! {
        pub const fn #field_ident(&self) -> #lens_ident {
            #lens_ident
        }
    };

    Some((lens, accessor))
}

fn formgate_path() -> TokenStream2 {
    match crate_name("formgate") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::formgate),
    }
}

fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    for segment in input.split('_') {
        if segment.is_empty() {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
