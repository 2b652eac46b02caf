use pretty_assertions::assert_eq;

use y86_rs::instructions::{lookup, Icode};
use y86_rs::{assemble_source, AsmConfig, ErrorKind};

fn asm(src: &str) -> y86_rs::Assembled {
    assemble_source(src, AsmConfig::default()).unwrap()
}

#[test]
fn size_follows_class() {
    let expect = [
        (Icode::Halt, 1),
        (Icode::Nop, 1),
        (Icode::Ret, 1),
        (Icode::Rrmovl, 2),
        (Icode::Opl, 2),
        (Icode::Pushl, 2),
        (Icode::Popl, 2),
        (Icode::Jxx, 5),
        (Icode::Call, 5),
        (Icode::Irmovl, 6),
        (Icode::Rmmovl, 6),
        (Icode::Mrmovl, 6),
    ];
    for (icode, size) in expect {
        assert_eq!(icode.size(), size, "{icode:?}");
    }
    assert_eq!(lookup("cmovg").map(|d| d.opcode()), Some(0x26));
    assert_eq!(lookup("xorl").map(|d| d.opcode()), Some(0x63));
    assert!(lookup("movl").is_none());
}

#[test]
fn one_of_each_class() {
    let out = asm("
        halt
        nop
        cmovg %eax,%ebx
        irmovl $1,%eax
        rmmovl %eax,4(%ebx)
        mrmovl 4(%ebx),%eax
        xorl %eax,%eax
        jmp 0
        call 0
        ret
        pushl %eax
        popl %eax
    ");
    let lens: Vec<u32> = out.listing.iter().map(|e| e.len).collect();
    assert_eq!(lens, vec![1, 1, 2, 6, 6, 6, 2, 5, 5, 1, 2, 2]);
    assert_eq!(out.image.len(), 39);

    let b = out.image.as_bytes();
    assert_eq!(&b[2..4], &[0x26, 0x03]);
    assert_eq!(&b[4..10], &[0x30, 0xF0, 1, 0, 0, 0]);
    assert_eq!(&b[10..16], &[0x40, 0x03, 4, 0, 0, 0]);
    assert_eq!(&b[16..22], &[0x50, 0x03, 4, 0, 0, 0]);
    assert_eq!(&b[35..39], &[0xA0, 0x0F, 0xB0, 0x0F]);
}

#[test]
fn negative_and_hex_immediates() {
    let out = asm("
        irmovl $-1,%eax
        mrmovl -8(%esp),%ecx
        irmovl 0x10,%edx
    ");
    let b = out.image.as_bytes();
    assert_eq!(&b[0..6], &[0x30, 0xF0, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&b[6..12], &[0x50, 0x14, 0xF8, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&b[12..18], &[0x30, 0xF2, 0x10, 0, 0, 0]);
}

#[test]
fn align_rounds_up_only_when_needed() {
    let out = asm("
        .pos 4
        .align 4
    x:  .long 1
        .align 8
    y:  .long 2
    ");
    assert_eq!(out.symbols.value("x"), Some(4));
    assert_eq!(out.symbols.value("y"), Some(8));
    assert_eq!(out.image.as_bytes(), &[0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);
    // directives that only move the offset leave no listing rows
    assert_eq!(out.listing.len(), 2);
}

#[test]
fn length_is_the_highest_emission() {
    let out = asm("
        .pos 0x20
        .long 5
        .pos 0
        halt
    ");
    assert_eq!(out.image.len(), 0x24);
    assert_eq!(out.image.as_bytes()[0x20], 5);

    // moving past the end without emitting does not grow the image
    let out = asm("
        nop
        .pos 100
    end:
    ");
    assert_eq!(out.image.len(), 1);
    assert_eq!(out.symbols.value("end"), Some(100));
}

#[test]
fn empty_source_gives_empty_image() {
    let out = asm("# nothing here\n\n");
    assert!(out.image.is_empty());
    assert!(out.listing.is_empty());
}

#[test]
fn emission_past_capacity_fails() {
    let err = assemble_source("irmovl $1,%eax\nirmovl $2,%eax\n", AsmConfig { capacity: 8 })
        .unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.source.kind(), ErrorKind::Capacity);

    // exactly full is fine
    let out = assemble_source("irmovl $1,%eax\nnop\nnop\n", AsmConfig { capacity: 8 }).unwrap();
    assert_eq!(out.image.len(), 8);
}
