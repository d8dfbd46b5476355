//! Signature formatting for rustdoc types.

use crate::index::CrateIndex;
use rustdoc_types::{
    AssocItemConstraintKind, GenericArg, GenericArgs, GenericBound, GenericParamDef,
    GenericParamDefKind, Generics, Item, ItemEnum, Path, Term, TraitBoundModifier, Type,
    WherePredicate,
};
use std::fmt::{self, Write};

/// Where clauses longer than this move onto their own lines.
const INLINE_WHERE_LIMIT: usize = 80;

/// Writes rustdoc types as Rust-like source text.
///
/// Holds a reference to a `CrateIndex` for resolving path names.
pub struct TypeFormatter<'a> {
    index: &'a CrateIndex,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(index: &'a CrateIndex) -> Self {
        Self { index }
    }

    pub fn write_type<W: Write>(&self, w: &mut W, ty: &Type) -> fmt::Result {
        match ty {
            Type::ResolvedPath(path) => self.write_resolved_path(w, path),
            Type::Generic(name) | Type::Primitive(name) => w.write_str(name),
            Type::BorrowedRef {
                lifetime,
                is_mutable,
                type_,
            } => {
                w.write_char('&')?;
                if let Some(lt) = lifetime {
                    write!(w, "{} ", lt)?;
                }
                if *is_mutable {
                    w.write_str("mut ")?;
                }
                self.write_type(w, type_)
            }
            Type::Tuple(types) => {
                w.write_char('(')?;
                self.write_separated(w, types, ", ")?;
                if types.len() == 1 {
                    w.write_char(',')?;
                }
                w.write_char(')')
            }
            Type::Slice(inner) => {
                w.write_char('[')?;
                self.write_type(w, inner)?;
                w.write_char(']')
            }
            Type::Array { type_, len } => {
                w.write_char('[')?;
                self.write_type(w, type_)?;
                write!(w, "; {}]", len)
            }
            Type::RawPointer { is_mutable, type_ } => {
                w.write_str(if *is_mutable { "*mut " } else { "*const " })?;
                self.write_type(w, type_)
            }
            Type::FunctionPointer(_) => w.write_str("fn(...)"),
            Type::QualifiedPath {
                name, self_type, ..
            } => {
                self.write_type(w, self_type)?;
                write!(w, "::{}", name)
            }
            Type::ImplTrait(bounds) => {
                w.write_str("impl ")?;
                self.write_bounds(w, bounds)
            }
            Type::DynTrait(..) | Type::Pat { .. } | Type::Infer => w.write_char('_'),
        }
    }

    /// Write angle-bracketed generics, skipping synthetic `impl Trait` params.
    pub fn write_generics<W: Write>(&self, w: &mut W, generics: &Generics) -> fmt::Result {
        let params: Vec<_> = generics
            .params
            .iter()
            .filter(|p| {
                !matches!(
                    &p.kind,
                    GenericParamDefKind::Type {
                        is_synthetic: true,
                        ..
                    }
                )
            })
            .collect();

        if params.is_empty() {
            return Ok(());
        }

        w.write_char('<')?;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                w.write_str(", ")?;
            }
            self.write_generic_param(w, param)?;
        }
        w.write_char('>')
    }

    /// Write a where clause inline when short, one predicate per line otherwise.
    pub fn write_where_clause<W: Write>(
        &self,
        w: &mut W,
        predicates: &[WherePredicate],
        current_line_len: usize,
    ) -> fmt::Result {
        if predicates.is_empty() {
            return Ok(());
        }

        let formatted: Vec<String> = predicates
            .iter()
            .map(|p| self.format_where_predicate(p))
            .collect();
        let inline = format!(" where {}", formatted.join(", "));

        if predicates.len() > 2 || current_line_len + inline.len() > INLINE_WHERE_LIMIT {
            w.write_str("\nwhere\n")?;
            for pred in &formatted {
                writeln!(w, "    {},", pred)?;
            }
            Ok(())
        } else {
            w.write_str(&inline)
        }
    }

    /// Write supertrait bounds: `: Clone + Debug`, or a `where Self:` clause when long.
    pub fn write_supertrait_bounds<W: Write>(
        &self,
        w: &mut W,
        bounds: &[GenericBound],
        current_line_len: usize,
    ) -> fmt::Result {
        if bounds.is_empty() {
            return Ok(());
        }

        let mut joined = String::new();
        self.write_bounds(&mut joined, bounds)?;

        if bounds.len() > 2 || current_line_len + joined.len() + 2 > INLINE_WHERE_LIMIT {
            write!(w, "\nwhere\n    Self: {}", joined)
        } else {
            write!(w, ": {}", joined)
        }
    }

    /// Write `fn name<..>(args) -> ret where ..`. Writes nothing for non-functions.
    pub fn write_function_signature<W: Write>(&self, w: &mut W, item: &Item) -> fmt::Result {
        let ItemEnum::Function(func) = &item.inner else {
            return Ok(());
        };

        let mut sig = String::new();
        if func.header.is_const {
            sig.push_str("const ");
        }
        if func.header.is_async {
            sig.push_str("async ");
        }
        if func.header.is_unsafe {
            sig.push_str("unsafe ");
        }
        sig.push_str("fn ");
        sig.push_str(item.name.as_deref().unwrap_or("<unnamed>"));
        self.write_generics(&mut sig, &func.generics)?;

        sig.push('(');
        for (i, (param_name, ty)) in func.sig.inputs.iter().enumerate() {
            if i > 0 {
                sig.push_str(", ");
            }
            if param_name == "self" {
                self.write_self_param(&mut sig, ty)?;
            } else {
                write!(sig, "{}: ", param_name)?;
                self.write_type(&mut sig, ty)?;
            }
        }
        sig.push(')');

        if let Some(output) = &func.sig.output {
            sig.push_str(" -> ");
            self.write_type(&mut sig, output)?;
        }

        let line_len = sig.lines().last().map_or(0, str::len);
        w.write_str(&sig)?;
        self.write_where_clause(w, &func.generics.where_predicates, line_len)
    }

    /// `self`, `&self`, `&mut self` instead of `self: &Self`.
    fn write_self_param<W: Write>(&self, w: &mut W, ty: &Type) -> fmt::Result {
        match ty {
            Type::Generic(name) if name == "Self" => w.write_str("self"),
            Type::BorrowedRef {
                lifetime,
                is_mutable,
                type_,
            } if matches!(type_.as_ref(), Type::Generic(name) if name == "Self") => {
                w.write_char('&')?;
                if let Some(lt) = lifetime {
                    write!(w, "{} ", lt)?;
                }
                if *is_mutable {
                    w.write_str("mut ")?;
                }
                w.write_str("self")
            }
            _ => {
                w.write_str("self: ")?;
                self.write_type(w, ty)
            }
        }
    }

    fn write_separated<W: Write>(&self, w: &mut W, types: &[Type], sep: &str) -> fmt::Result {
        for (i, t) in types.iter().enumerate() {
            if i > 0 {
                w.write_str(sep)?;
            }
            self.write_type(w, t)?;
        }
        Ok(())
    }

    fn write_resolved_path<W: Write>(&self, w: &mut W, path: &Path) -> fmt::Result {
        let name = self
            .index
            .paths()
            .get(&path.id)
            .and_then(|summary| summary.path.last())
            .map(String::as_str)
            .or_else(|| path.path.rsplit("::").next())
            .unwrap_or("_");
        w.write_str(name)?;
        match path.args.as_deref() {
            Some(args) => self.write_args(w, args),
            None => Ok(()),
        }
    }

    fn write_args<W: Write>(&self, w: &mut W, args: &GenericArgs) -> fmt::Result {
        match args {
            GenericArgs::AngleBracketed { args, constraints } => {
                if args.is_empty() && constraints.is_empty() {
                    return Ok(());
                }
                w.write_char('<')?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    self.write_generic_arg(w, arg)?;
                }
                for (i, constraint) in constraints.iter().enumerate() {
                    if !args.is_empty() || i > 0 {
                        w.write_str(", ")?;
                    }
                    match &constraint.binding {
                        AssocItemConstraintKind::Equality(term) => {
                            write!(w, "{} = ", constraint.name)?;
                            self.write_term(w, term)?;
                        }
                        AssocItemConstraintKind::Constraint(bounds) => {
                            write!(w, "{}: ", constraint.name)?;
                            self.write_bounds(w, bounds)?;
                        }
                    }
                }
                w.write_char('>')
            }
            GenericArgs::Parenthesized { inputs, output } => {
                w.write_char('(')?;
                self.write_separated(w, inputs, ", ")?;
                w.write_char(')')?;
                if let Some(out) = output {
                    w.write_str(" -> ")?;
                    self.write_type(w, out)?;
                }
                Ok(())
            }
            GenericArgs::ReturnTypeNotation => w.write_str("(..)"),
        }
    }

    fn write_generic_arg<W: Write>(&self, w: &mut W, arg: &GenericArg) -> fmt::Result {
        match arg {
            GenericArg::Lifetime(lt) => w.write_str(lt),
            GenericArg::Type(t) => self.write_type(w, t),
            GenericArg::Const(c) => write!(w, "{{{}}}", c.expr),
            GenericArg::Infer => w.write_char('_'),
        }
    }

    fn write_term<W: Write>(&self, w: &mut W, term: &Term) -> fmt::Result {
        match term {
            Term::Type(ty) => self.write_type(w, ty),
            Term::Constant(c) => w.write_str(&c.expr),
        }
    }

    fn write_bounds<W: Write>(&self, w: &mut W, bounds: &[GenericBound]) -> fmt::Result {
        for (i, bound) in bounds.iter().enumerate() {
            if i > 0 {
                w.write_str(" + ")?;
            }
            self.write_bound(w, bound)?;
        }
        Ok(())
    }

    fn write_bound<W: Write>(&self, w: &mut W, bound: &GenericBound) -> fmt::Result {
        match bound {
            GenericBound::TraitBound {
                trait_,
                generic_params,
                modifier,
            } => {
                if !generic_params.is_empty() {
                    let names: Vec<_> = generic_params.iter().map(|p| p.name.as_str()).collect();
                    write!(w, "for<{}> ", names.join(", "))?;
                }
                match modifier {
                    TraitBoundModifier::Maybe => w.write_char('?')?,
                    TraitBoundModifier::MaybeConst => w.write_str("~const ")?,
                    TraitBoundModifier::None => {}
                }
                self.write_resolved_path(w, trait_)
            }
            GenericBound::Outlives(lifetime) => w.write_str(lifetime),
            GenericBound::Use(_) => w.write_str("use<..>"),
        }
    }

    fn write_generic_param<W: Write>(&self, w: &mut W, param: &GenericParamDef) -> fmt::Result {
        match &param.kind {
            GenericParamDefKind::Lifetime { outlives } => {
                w.write_str(&param.name)?;
                if !outlives.is_empty() {
                    write!(w, ": {}", outlives.join(" + "))?;
                }
                Ok(())
            }
            GenericParamDefKind::Type {
                bounds, default, ..
            } => {
                w.write_str(&param.name)?;
                if !bounds.is_empty() {
                    w.write_str(": ")?;
                    self.write_bounds(w, bounds)?;
                }
                if let Some(default_ty) = default {
                    w.write_str(" = ")?;
                    self.write_type(w, default_ty)?;
                }
                Ok(())
            }
            GenericParamDefKind::Const { type_, default } => {
                write!(w, "const {}: ", param.name)?;
                self.write_type(w, type_)?;
                if let Some(default_val) = default {
                    write!(w, " = {}", default_val)?;
                }
                Ok(())
            }
        }
    }

    fn format_where_predicate(&self, pred: &WherePredicate) -> String {
        let mut s = String::new();
        let _ = match pred {
            WherePredicate::BoundPredicate {
                type_,
                bounds,
                generic_params,
            } => {
                if !generic_params.is_empty() {
                    let names: Vec<_> = generic_params.iter().map(|p| p.name.as_str()).collect();
                    let _ = write!(s, "for<{}> ", names.join(", "));
                }
                self.write_type(&mut s, type_)
                    .and_then(|()| s.write_str(": "))
                    .and_then(|()| self.write_bounds(&mut s, bounds))
            }
            WherePredicate::LifetimePredicate { lifetime, outlives } => {
                write!(s, "{}: {}", lifetime, outlives.join(" + "))
            }
            WherePredicate::EqPredicate { lhs, rhs } => self
                .write_type(&mut s, lhs)
                .and_then(|()| s.write_str(" = "))
                .and_then(|()| self.write_term(&mut s, rhs)),
        };
        s
    }
}
