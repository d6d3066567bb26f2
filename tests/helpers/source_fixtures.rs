//! Common source code fixtures for tests.

// Simple lines
pub const LABEL_NOP: &str = "LABEL: nop";
pub const DANGLING_OPERATOR: &str = "DEF X = 1 + ";

// A small but complete program
pub const HELLO_WORLD: &str = r#"INCLUDE "hardware.inc"

SECTION "Header", ROM0[$100]
	jp EntryPoint
	ds $150 - @, 0

SECTION "Entry point", ROM0

; Turn the LCD off before touching VRAM
EntryPoint:
	ld a, 0
	ld [rNR52], a
.waitVBlank
	ld a, [rLY]
	cp 144
	jr c, .waitVBlank
	ret
"#;

pub const MACROS_AND_BLOCKS: &str = r#"MACRO copy_bytes
	REPT \1
		ld a, [hl+]
		ld [de], a
		inc de
	ENDR
ENDM

DEF TILE_SIZE EQU 16
IF DEF(DEBUG)
	copy_bytes TILE_SIZE
ELIF TILE_SIZE > 8
	FOR I, 0, 4
		db I * 2
	ENDR
ELSE
	PRINTLN "no debug"
ENDC
"#;

/// Lines that parse without errors, used to build random files
pub const VALID_LINES: &[&str] = &[
    "nop",
    "Main:",
    ".loop: dec b",
    "\tld a, [hl+]",
    "  jr nz, .loop",
    "ld hl, sp + 4",
    "DEF X EQU 3",
    "db 1, 2, \"three\"",
    "dw (1 + 2) * X",
    "SECTION \"s\", ROMX, BANK[2]",
    "; comment only",
    "halt ; trailing comment",
    "farcall Func, 1",
    "",
    "ASSERT X < 4",
];

/// Lines that always contain a syntax error
pub const BROKEN_LINES: &[&str] = &[
    "ld a, )",
    "DEF = 4",
    "db 1 +",
    ") )",
    "SECTION ,",
    "ld [hl, a",
];

/// Snippets inserted by random edits
pub const EDIT_SNIPPETS: &[&str] = &[
    "",
    "\n",
    "nop\n",
    "IF 1\n",
    "ENDC\n",
    "REPT 2\n",
    "ENDR",
    "(",
    ")",
    "\"",
    ";",
    "/*",
    "*/",
    ",",
    "x",
    ":",
    "\\\n",
    "1 + ",
    "MACRO m\n",
    "ENDM\n",
];
