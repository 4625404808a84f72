use darling::{
    FromDeriveInput, FromVariant, FromField,
    Error,
    util, ast,
};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Ident, LitStr};
use quote::quote;

#[derive(Debug, FromField)]
struct InstructionField {
    ident: Option<Ident>,
    ty: syn::Type,
}

#[derive(Debug, FromVariant)]
struct InstructionVariant {
    ident: Ident,
    fields: ast::Fields<InstructionField>,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_named, enum_unit))]
struct InstructionInput {
    ident: Ident,
    generics: syn::Generics,
    data: ast::Data<InstructionVariant, util::Ignored>
}

impl InstructionVariant {
    /// The lowercase name this variant is parsed from
    fn mnemonic(&self) -> LitStr {
        let name = self.ident.to_string().to_lowercase();
        LitStr::new(&name, self.ident.span())
    }
}

#[proc_macro_derive(ParseInstruction)]
pub fn instruction(input: TokenStream) -> TokenStream {
    let input = match InstructionInput::from_derive_input(&parse_macro_input!(input as DeriveInput)) {
        Ok(v) => v,
        Err(e) => {
            return e.write_errors().into();
        }
    };

    let variants = match input.data.take_enum() {
        Some(v) => v,
        None => return Error::unsupported_shape("struct").write_errors().into(),
    };

    let mut mnemonics = Vec::new();
    let mut idents = Vec::new();
    let mut arms = Vec::new();
    for var in variants {
        let mnemonic = var.mnemonic();
        let ident = var.ident;

        /*
         * Operands are parsed left to right in field declaration order,
         * so the first bad operand is the one reported.
         */
        let count = var.fields.len();
        let mut field_parsers = Vec::new();
        for (i, f) in var.fields.into_iter().enumerate() {
            let name = f.ident;
            let ty = f.ty;
            field_parsers.push(quote! {
                #name: <#ty as crate::isa::ParseOperand>::parse(operands[#i], #i)?
            });
        }

        arms.push(quote! {
            #mnemonic => {
                if operands.len() != #count {
                    return ::std::result::Result::Err(crate::isa::Error::OperandCount {
                        mnemonic: #mnemonic,
                        expected: #count,
                        found: operands.len(),
                    });
                }
                ::std::result::Result::Ok(Self::#ident { #(#field_parsers),* })
            },
        });
        mnemonics.push(mnemonic);
        idents.push(ident);
    }

    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        impl #impl_generics crate::isa::ParseInstruction for #name #ty_generics #where_clause {
            const MNEMONICS: &'static [&'static str] = &[#(#mnemonics),*];

            fn parse(mnemonic: &str, operands: &[&str]) -> ::std::result::Result<Self, crate::isa::Error> {
                match mnemonic.to_lowercase().as_str() {
                    #(#arms)*
                    _ => ::std::result::Result::Err(crate::isa::Error::UnknownInstruction {
                        mnemonic: mnemonic.to_string(),
                        expected: Self::MNEMONICS,
                    }),
                }
            }

            fn mnemonic(&self) -> &'static str {
                match self {
                    #(Self::#idents { .. } => #mnemonics,)*
                }
            }
        }
    }.into()
}

#[derive(Debug, FromField)]
#[darling(attributes(encode))]
struct EncodeInstructionField {
    ident: Option<Ident>,
    field: syn::Expr,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(encode))]
struct EncodeInstructionVariant {
    ident: Ident,
    opcode: syn::Expr,
    fields: ast::Fields<EncodeInstructionField>,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_named, enum_unit), attributes(encode))]
struct EncodeInstructionInput {
    ident: Ident,
    generics: syn::Generics,
    opcode_field: syn::Expr,
    data: ast::Data<EncodeInstructionVariant, util::Ignored>
}

#[proc_macro_derive(EncodeInstruction, attributes(encode))]
pub fn encode_instruction(input: TokenStream) -> TokenStream {
    let input = match EncodeInstructionInput::from_derive_input(&parse_macro_input!(input as DeriveInput)) {
        Ok(v) => v,
        Err(e) => {
            return e.write_errors().into();
        }
    };

    let variants = match input.data.take_enum() {
        Some(v) => v,
        None => return Error::unsupported_shape("struct").write_errors().into(),
    };
    let opcode_field = input.opcode_field;

    let mut arms = Vec::new();
    let mut checks = Vec::new();
    for var in variants.into_iter() {
        let ident = var.ident;
        let opcode = var.opcode;

        let msg = LitStr::new(
            &format!("opcode of {ident} does not fit the opcode field"),
            ident.span(),
        );
        checks.push(quote! {
            assert!(((#opcode) as u32) <= crate::isa::Field::max(#opcode_field), #msg);
        });

        let mut fields = Vec::new();
        let mut field_encoders = Vec::new();
        for f in var.fields.into_iter() {
            let name = f.ident;
            let field = f.field;
            field_encoders.push(quote! {
                crate::isa::EncodeOperand::encode_into(#name, &mut __word, #field);
            });
            fields.push(name);
        }

        arms.push(quote! {
            Self::#ident { #(#fields),* } => {
                __word |= crate::isa::Field::place(#opcode_field, #opcode);
                #(#field_encoders)*
            },
        });
    }

    let name = input.ident;
    let (generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        const _: () = {
            #(#checks)*
        };

        impl #generics crate::isa::EncodeInstruction for #name #ty_generics #where_clause {
            fn encode(&self) -> crate::isa::InstructionWord {
                let mut __word: u32 = 0;
                match self {
                    #(#arms)*
                }
                crate::isa::InstructionWord::from(__word)
            }
        }
    }.into()
}
