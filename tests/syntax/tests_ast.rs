//! Typed AST over whole programs

use rgbasm::parser::{
    AstNode, Block, Directive, Expr, Item, Literal, Operand, SourceFile, Statement,
};
use rgbasm::parse;

use crate::helpers::source_fixtures::{HELLO_WORLD, MACROS_AND_BLOCKS};

fn source_file(text: &str) -> SourceFile {
    let tree = parse(text).unwrap();
    assert!(!tree.has_errors(), "{:?}", tree.errors());
    SourceFile::cast(tree.syntax()).unwrap()
}

#[test]
fn test_hello_world_outline() {
    let file = source_file(HELLO_WORLD);

    let sections: Vec<_> = file
        .items()
        .filter_map(|item| match item {
            Item::Statement(Statement::Directive(Directive::SectionDirective(s))) => s.name(),
            _ => None,
        })
        .collect();
    assert_eq!(sections, ["Header", "Entry point"]);

    let entry = file.labels().find(|l| !l.is_local()).unwrap();
    assert_eq!(
        entry.doc_comment().as_deref(),
        Some("Turn the LCD off before touching VRAM")
    );

    let mnemonics: Vec<_> = file
        .instructions()
        .filter_map(|i| i.mnemonic_name())
        .collect();
    assert_eq!(mnemonics, ["jp", "ld", "ld", "ld", "cp", "jr", "ret"]);
}

#[test]
fn test_jump_targets() {
    let file = source_file(HELLO_WORLD);
    let targets: Vec<_> = file
        .instructions()
        .filter(|i| matches!(i.mnemonic_name().as_deref(), Some("jp" | "jr")))
        .filter_map(|i| {
            i.operands().into_iter().find_map(|op| match op {
                Operand::Expr(expr) => expr.name_refs().next().and_then(|n| n.text()),
                _ => None,
            })
        })
        .collect();
    assert_eq!(targets, ["EntryPoint", ".waitVBlank"]);
}

#[test]
fn test_nested_blocks() {
    let file = source_file(MACROS_AND_BLOCKS);
    let def = file.macro_defs().next().unwrap();
    assert_eq!(def.name().unwrap().text(), "copy_bytes");

    let body: Vec<_> = def.items().collect();
    assert_eq!(body.len(), 1);
    let Item::Statement(Statement::Block(Block::ReptBlock(rept))) = &body[0] else {
        panic!("expected REPT inside the macro");
    };
    assert!(matches!(rept.count(), Some(Expr::MacroArgRef(_))));
    assert_eq!(rept.items().count(), 3);

    let if_block = file
        .items()
        .find_map(|item| match item {
            Item::Statement(Statement::Block(Block::IfBlock(b))) => Some(b),
            _ => None,
        })
        .unwrap();
    let Some(Expr::CallExpr(defined)) = if_block.condition() else {
        panic!("expected DEF(...)");
    };
    assert_eq!(defined.name().as_deref(), Some("DEF"));

    let elif = if_block.elif_clauses().next().unwrap();
    let Some(Item::Statement(Statement::Block(Block::ForBlock(for_block)))) = elif.items().next() else {
        panic!("expected FOR inside ELIF");
    };
    assert_eq!(for_block.variable().unwrap().text(), "I");
    let stop: Vec<_> = for_block
        .stop()
        .into_iter()
        .filter_map(|e| match e {
            Expr::Literal(lit) => lit.int_value(),
            _ => None,
        })
        .collect();
    assert_eq!(stop, [4]);
}

#[test]
fn test_literals_in_file() {
    let file = source_file(HELLO_WORLD);
    let numbers: Vec<u32> = file
        .syntax()
        .descendants()
        .filter_map(Literal::cast)
        .filter_map(|lit| lit.int_value())
        .collect();
    assert_eq!(numbers, [0x100, 0x150, 0, 0, 144]);
}
