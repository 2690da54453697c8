use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Attribute, Ident, ItemStruct, Path, Token,
};

/// A provider entry: `Service` or `Service => singleton`
struct ModuleItem {
    attrs: Vec<Attribute>,
    path: Path,
    scope: Option<Ident>,
}

impl Parse for ModuleItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let path = input.parse()?;

        let scope = if input.peek(Token![=>]) {
            input.parse::<Token![=>]>()?;
            let scope: Ident = input.parse()?;
            if scope != "singleton" && scope != "transient" {
                return Err(syn::Error::new_spanned(
                    scope,
                    "expected `singleton` or `transient`",
                ));
            }
            Some(scope)
        } else {
            None
        };

        Ok(ModuleItem { attrs, path, scope })
    }
}

struct ModuleArgs {
    imports: Vec<ModuleItem>,
    providers: Vec<ModuleItem>,
}

impl Parse for ModuleArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut imports = Vec::new();
        let mut providers = Vec::new();

        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            // Parse array: [Item1, Item2, ...]
            let content;
            syn::bracketed!(content in input);

            if name == "imports" {
                let items = content.parse_terminated(ModuleItem::parse, Token![,])?;
                imports = items.into_iter().collect();
            } else if name == "providers" {
                let items = content.parse_terminated(ModuleItem::parse, Token![,])?;
                providers = items.into_iter().collect();
            } else {
                return Err(syn::Error::new_spanned(
                    name,
                    "expected `imports` or `providers`",
                ));
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ModuleArgs { imports, providers })
    }
}

pub fn module_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ModuleArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_module_impl(&args, &input);

    TokenStream::from(expanded)
}

fn generate_module_impl(args: &ModuleArgs, input: &ItemStruct) -> TokenStream2 {
    let module_name = &input.ident;

    // Generate import registrations (call other modules' register)
    let import_registrations = args.imports.iter().map(|item| {
        let path = &item.path;
        let attrs = &item.attrs;
        quote! {
            #(#attrs)*
            <#path as ::injectra::Module>::register(container)?;
        }
    });

    // Generate registration code for providers
    let provider_registrations = args.providers.iter().map(|item| {
        let path = &item.path;
        let attrs = &item.attrs;
        match &item.scope {
            Some(scope) if scope == "singleton" => quote! {
                #(#attrs)*
                container.register::<#path>(::injectra::Scope::Singleton)?;
            },
            Some(_) => quote! {
                #(#attrs)*
                container.register::<#path>(::injectra::Scope::Transient)?;
            },
            None => quote! {
                #(#attrs)*
                container.register_declared::<#path>()?;
            },
        }
    });

    quote! {
        #input

        impl ::injectra::Module for #module_name {
            fn register(
                container: &mut ::injectra::Container
            ) -> ::injectra::Result<()> {
                #(#import_registrations)*
                #(#provider_registrations)*
                Ok(())
            }
        }

        impl #module_name {
            /// Create a new container and register this module
            pub fn create_container() -> ::injectra::Result<::injectra::Container> {
                let mut container = ::injectra::Container::new();
                <Self as ::injectra::Module>::register(&mut container)?;
                Ok(container)
            }
        }
    }
}
