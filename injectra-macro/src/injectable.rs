use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Field, Fields, GenericArgument, LitStr, PathArguments, Type};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = generate_injectable_impl(&input).unwrap_or_else(syn::Error::into_compile_error);
    TokenStream::from(expanded)
}

/// How a field is obtained from the container.
enum FieldKind {
    /// `Arc<T>`: resolve `T` through the container.
    Inject(Type),
    /// `Arc<dyn Trait>`: look up a registered `Arc<dyn Trait>` value.
    Shared(Type),
    /// Anything else: a cloned value.
    Value(Type),
}

struct FieldSpec {
    name: String,
    kind: FieldKind,
    default: Option<Expr>,
}

fn generate_injectable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let scope = parse_scope(input)?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[derive(Injectable)] can only be applied to structs",
            ))
        }
    };

    let specs = match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[derive(Injectable)] only supports structs with named fields",
            ))
        }
    };

    let dependencies = specs.iter().map(dependency_tokens);

    let body = match fields {
        Fields::Named(named) => {
            let assignments = named.named.iter().zip(&specs).map(|(field, spec)| {
                let field_name = &field.ident;
                let value = argument_tokens(spec);
                quote!(#field_name: #value)
            });
            quote!(Self { #(#assignments),* })
        }
        _ => quote!(Self),
    };

    Ok(quote! {
        impl #impl_generics ::injectra::Injectable for #struct_name #ty_generics #where_clause {
            const SCOPE: ::injectra::Scope = #scope;

            fn dependencies() -> ::std::vec::Vec<::injectra::Dependency> {
                ::std::vec![#(#dependencies),*]
            }

            #[allow(unused_variables)]
            fn construct(args: ::injectra::Arguments) -> ::injectra::Result<Self> {
                ::std::result::Result::Ok(#body)
            }
        }
    })
}

/// Parse `#[injectable(scope = "singleton")]`
fn parse_scope(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut scope = quote!(::injectra::Scope::Transient);

    for attr in &input.attrs {
        if !attr.path().is_ident("injectable") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("scope") {
                let value: LitStr = meta.value()?.parse()?;
                scope = match value.value().to_ascii_lowercase().as_str() {
                    "singleton" => quote!(::injectra::Scope::Singleton),
                    "transient" => quote!(::injectra::Scope::Transient),
                    _ => return Err(syn::Error::new_spanned(value, "expected \"singleton\" or \"transient\"")),
                };
                Ok(())
            } else {
                Err(meta.error("unsupported injectable attribute"))
            }
        })?;
    }

    Ok(scope)
}

/// Parse `#[inject(name = "...", default = expr, value)]`
fn parse_field(field: &Field) -> syn::Result<FieldSpec> {
    let mut name = field.ident.as_ref().map(|ident| ident.to_string()).unwrap_or_default();
    let mut default = None;
    let mut force_value = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("inject") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = value.value();
                Ok(())
            } else if meta.path.is_ident("default") {
                default = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else if meta.path.is_ident("value") {
                force_value = true;
                Ok(())
            } else {
                Err(meta.error("unsupported inject attribute"))
            }
        })?;
    }

    let kind = match arc_inner(&field.ty) {
        Some(inner) if !force_value => match inner {
            Type::TraitObject(_) => FieldKind::Shared(field.ty.clone()),
            _ => FieldKind::Inject(inner.clone()),
        },
        _ => FieldKind::Value(field.ty.clone()),
    };

    Ok(FieldSpec { name, kind, default })
}

fn dependency_tokens(spec: &FieldSpec) -> TokenStream2 {
    let name = &spec.name;
    let (base, stored) = match &spec.kind {
        FieldKind::Inject(ty) => (quote!(::injectra::Dependency::inject::<#ty>(#name)), ty),
        FieldKind::Shared(ty) | FieldKind::Value(ty) => (quote!(::injectra::Dependency::value::<#ty>(#name)), ty),
    };

    match &spec.default {
        Some(expr) => quote!(#base.with_default::<#stored>(#expr)),
        None => base,
    }
}

fn argument_tokens(spec: &FieldSpec) -> TokenStream2 {
    let name = &spec.name;
    match &spec.kind {
        FieldKind::Inject(ty) => quote!(args.get::<#ty>(#name)?),
        FieldKind::Shared(ty) => quote!(::std::sync::Arc::clone(&*args.get::<#ty>(#name)?)),
        FieldKind::Value(ty) => quote!(args.value::<#ty>(#name)?),
    }
}

/// Extract the inner type from Arc<T> or Arc<dyn Trait>
fn arc_inner(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                        return Some(inner_type);
                    }
                }
            }
        }
    }

    None
}
