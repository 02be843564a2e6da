use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, Fields, Index};

/// A field receiving one column.
pub(crate) struct ScanField {
    pub(crate) access: TokenStream,
}

fn is_skipped(field: &Field) -> bool {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("scan")) {
        if let Err(e) = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown `scan` option"))
            }
        }) {
            panic!("Error while parsing `scan`, use it like #[scan(skip)]: {e}");
        }
    }
    skip
}

/// Fields to scan in declaration order, leaving out `#[scan(skip)]`.
pub(crate) fn decode_fields(fields: &Fields) -> Vec<ScanField> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !is_skipped(field))
        .map(|(i, field)| {
            let member = match &field.ident {
                Some(ident) => ident.to_token_stream(),
                None => Index::from(i).to_token_stream(),
            };
            ScanField {
                access: quote!(self.#member),
            }
        })
        .collect()
}
