//! Integration tests for module loading and symbol queries.

use camino::Utf8Path;
use pretty_assertions::assert_eq;
use swc_ecma_ast::{Decl, ModuleDecl, ModuleItem, Stmt, TsTypeElement};
use type_info::{DeclarationKind, MemorySources, Program, ProgramError, TypeInfo, TypeNode};

fn load(sources: &MemorySources, entry: &str) -> (Program, type_info::ModuleId) {
    Program::load(sources, Utf8Path::new(entry)).unwrap()
}

#[test]
fn test_local_declarations_are_indexed() {
    let sources = MemorySources::new().with_file(
        "/src/a.ts",
        r#"
type Alias = string
interface Shape { x: number }
class Model {}
enum Color { Red = 'red' }
"#,
    );
    let (program, entry) = load(&sources, "/src/a.ts");

    let kinds = ["Alias", "Shape", "Model", "Color"]
        .iter()
        .map(|name| {
            let symbol = program.symbol_named(entry, name).unwrap();
            match program.first_declaration(symbol).unwrap().kind {
                DeclarationKind::TypeAlias(_) => "alias",
                DeclarationKind::Interface(_) => "interface",
                DeclarationKind::Class(_) => "class",
                DeclarationKind::Enum(_) => "enum",
                DeclarationKind::Import(_) => "import",
            }
        })
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["alias", "interface", "class", "enum"]);
    assert!(program.symbol_named(entry, "Missing").is_none());
}

#[test]
fn test_import_resolves_through_reexports() {
    let sources = MemorySources::new()
        .with_file("/src/types/props.ts", "export interface Props { title: string }")
        .with_file("/src/types/index.ts", "export * from './props'")
        .with_file("/src/shared.ts", "export { Props as CardProps } from './types'")
        .with_file("/src/Card.ts", "import type { CardProps } from './shared'");
    let (program, entry) = load(&sources, "/src/Card.ts");
    assert_eq!(program.module_count(), 4);

    let local = program.symbol_named(entry, "CardProps").unwrap();
    let decl = program.first_declaration(local).unwrap();
    assert!(matches!(decl.kind, DeclarationKind::Import(_)));

    let target = program.aliased_symbol(local).unwrap();
    assert_eq!(program.symbol_name(target), "Props");
    let decl = program.first_declaration(target).unwrap();
    assert!(matches!(decl.kind, DeclarationKind::Interface(_)));
    assert_eq!(program.path(decl.module), Utf8Path::new("/src/types/props.ts"));
}

#[test]
fn test_default_import_binds_default_export() {
    let sources = MemorySources::new()
        .with_file("/src/props.ts", "export default interface Props { a: string }")
        .with_file("/src/a.ts", "import P from './props'");
    let (program, entry) = load(&sources, "/src/a.ts");

    let local = program.symbol_named(entry, "P").unwrap();
    let target = program.aliased_symbol(local).unwrap();
    assert_eq!(program.symbol_name(target), "Props");
}

#[test]
fn test_aliased_symbol_is_none_for_local_and_external() {
    let sources = MemorySources::new().with_file(
        "/src/a.ts",
        "import { PropType } from 'vue'\ntype Local = number",
    );
    let (program, entry) = load(&sources, "/src/a.ts");

    let local = program.symbol_named(entry, "Local").unwrap();
    assert!(program.aliased_symbol(local).is_none());
    let external = program.symbol_named(entry, "PropType").unwrap();
    assert!(program.aliased_symbol(external).is_none());
}

#[test]
fn test_type_only_imports_and_reexports() {
    let sources = MemorySources::new()
        .with_file("/src/model.ts", "export class Model {}\nexport class Store {}")
        .with_file("/src/types.ts", "export type { Store } from './model'")
        .with_file(
            "/src/a.ts",
            "import type { Model as TypeModel } from './model'\n\
             import { type Model as InlineModel } from './model'\n\
             import { Model } from './model'\n\
             import { Store } from './types'",
        );
    let (program, entry) = load(&sources, "/src/a.ts");
    let type_only = |name: &str| program.is_type_only(program.symbol_named(entry, name).unwrap());

    assert!(type_only("TypeModel"));
    assert!(type_only("InlineModel"));
    assert!(!type_only("Model"));
    assert!(type_only("Store"));

    let class = program.aliased_symbol(program.symbol_named(entry, "Model").unwrap()).unwrap();
    assert!(!program.is_type_only(class));
}

#[test]
fn test_unresolved_star_branch_does_not_mark_type_only() {
    let sources = MemorySources::new()
        .with_file("/src/empty.ts", "export const unrelated = 1")
        .with_file("/src/types.ts", "export type { Model } from './empty'")
        .with_file("/src/model.ts", "export class Model {}")
        .with_file("/src/index.ts", "export * from './types'\nexport * from './model'")
        .with_file("/src/a.ts", "import { Model } from './index'");
    let (program, entry) = load(&sources, "/src/a.ts");

    let local = program.symbol_named(entry, "Model").unwrap();
    let target = program.aliased_symbol(local).unwrap();
    assert_eq!(program.path(program.first_declaration(target).unwrap().module), Utf8Path::new("/src/model.ts"));
    assert!(!program.is_type_only(local));
}

#[test]
fn test_qualified_name_through_namespace_import() {
    let sources = MemorySources::new()
        .with_file("/src/props.ts", "export type Size = 'sm' | 'lg'")
        .with_file(
            "/src/a.ts",
            "import * as P from './props'\nlet value: P.Size",
        );
    let (program, entry) = load(&sources, "/src/a.ts");

    let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &program.module(entry).body[1] else {
        panic!("expected a variable declaration");
    };
    let swc_ecma_ast::Pat::Ident(binding) = &var.decls[0].name else {
        panic!("expected an identifier binding");
    };
    let swc_ecma_ast::TsType::TsTypeRef(reference) = &*binding.type_ann.as_ref().unwrap().type_ann
    else {
        panic!("expected a type reference");
    };

    let symbol = program.symbol_at(entry, &reference.type_name).unwrap();
    assert_eq!(program.symbol_name(symbol), "Size");
    assert_eq!(
        program.type_to_string(TypeNode::Entity(&reference.type_name)),
        "P.Size"
    );
}

#[test]
fn test_method_signature_text_and_docs() {
    let sources = MemorySources::new().with_file(
        "/src/a.ts",
        r#"export interface Props {
  /**
   * Called on click.
   * @param id the item
   */
  onSelect(id: number, extra?: string): void
  // not a doc comment
  untyped()
}
"#,
    );
    let (program, entry) = load(&sources, "/src/a.ts");

    let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = &program.module(entry).body[0]
    else {
        panic!("expected an exported declaration");
    };
    let Decl::TsInterface(iface) = &export.decl else {
        panic!("expected an interface");
    };
    let methods = iface
        .body
        .body
        .iter()
        .filter_map(|member| match member {
            TsTypeElement::TsMethodSignature(method) => Some(method),
            _ => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(
        program.type_to_string(TypeNode::Method(methods[0])),
        "(id: number, extra?: string) => void"
    );
    assert_eq!(program.type_to_string(TypeNode::Method(methods[1])), "() => any");
    assert_eq!(
        program.doc_comments(methods[0].span.lo),
        vec!["Called on click.", "@param id the item"]
    );
    assert!(program.doc_comments(methods[1].span.lo).is_empty());
}

#[test]
fn test_import_cycle_loads_each_module_once() {
    let sources = MemorySources::new()
        .with_file("/src/a.ts", "import { B } from './b'\nexport interface A { b: B }")
        .with_file("/src/b.ts", "import { A } from './a'\nexport interface B { a: A }");
    let (program, entry) = load(&sources, "/src/a.ts");
    assert_eq!(program.module_count(), 2);

    let b = program.symbol_named(entry, "B").unwrap();
    let target = program.aliased_symbol(b).unwrap();
    let decl = program.first_declaration(target).unwrap();
    assert_eq!(program.path(decl.module), Utf8Path::new("/src/b.ts"));
}

#[test]
fn test_entry_parse_error_is_reported() {
    let sources = MemorySources::new().with_file("/src/a.ts", "let x = ;\n");
    let err = Program::load(&sources, Utf8Path::new("/src/a.ts"))
        .err()
        .unwrap();
    match err {
        ProgramError::Parse { path, line, .. } => {
            assert_eq!(path, Utf8Path::new("/src/a.ts"));
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_entry_is_a_read_error() {
    let sources = MemorySources::new();
    let err = Program::load(&sources, Utf8Path::new("/src/nope.ts"))
        .err()
        .unwrap();
    assert!(matches!(err, ProgramError::Read { .. }));
    assert_eq!(err.to_string(), "failed to read /src/nope.ts");
}
