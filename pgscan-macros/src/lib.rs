mod decode_fields;

use decode_fields::decode_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implements `pgscan::Scannable`: every field is a scan target, in
/// declaration order. Fields marked `#[scan(skip)]` are left alone.
#[proc_macro_derive(Scannable, attributes(scan))]
pub fn derive_scannable(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let targets = decode_fields(&item.fields).into_iter().map(|f| {
        let access = f.access;
        quote!(&mut #access as &mut dyn ::pgscan::ScanTarget)
    });
    quote! {
        impl #impl_generics ::pgscan::Scannable for #name #ty_generics #where_clause {
            fn scan_targets(&mut self) -> ::std::vec::Vec<&mut dyn ::pgscan::ScanTarget> {
                ::std::vec![#(#targets),*]
            }
        }
    }
    .into()
}
