use y86_rs::alu::{alu, AluOp, Cond};
use y86_rs::Cc;

const MAX: u32 = i32::MAX as u32;
const MIN: u32 = i32::MIN as u32;

#[test]
fn add_overflow_at_signed_max() {
    // alu computes b OP a
    let out = alu(AluOp::Add, 1, MAX);
    assert_eq!(out.val, MIN);
    assert!(out.cc.contains(Cc::OF));
    assert!(out.cc.contains(Cc::SF));
    assert!(!out.cc.contains(Cc::ZF));

    let out = alu(AluOp::Add, 1, MAX - 1);
    assert!(!out.cc.contains(Cc::OF));
}

#[test]
fn sub_overflow_at_signed_min() {
    let out = alu(AluOp::Sub, 1, MIN);
    assert_eq!(out.val, MAX);
    assert!(out.cc.contains(Cc::OF));
    assert!(!out.cc.contains(Cc::SF));

    // opposite signs without overflow
    let out = alu(AluOp::Sub, (-1i32) as u32, 5);
    assert_eq!(out.val, 6);
    assert!(!out.cc.contains(Cc::OF));
}

#[test]
fn sub_is_b_minus_a() {
    let out = alu(AluOp::Sub, 10, 3);
    assert_eq!(out.val as i32, -7);
    assert!(out.cc.contains(Cc::SF));
    let out = alu(AluOp::Sub, 4, 4);
    assert_eq!(out.cc, Cc::ZF);
}

#[test]
fn logic_ops_never_overflow() {
    for (a, b) in [(MAX, MAX), (MIN, MIN), (MIN, MAX), (0xFFFF_FFFF, 0x8000_0001)] {
        assert!(!alu(AluOp::And, a, b).cc.contains(Cc::OF));
        assert!(!alu(AluOp::Xor, a, b).cc.contains(Cc::OF));
    }
    let out = alu(AluOp::And, 0xF0F0, 0x0FF0);
    assert_eq!(out.val, 0x00F0);
    let out = alu(AluOp::Xor, 0x1234, 0x1234);
    assert_eq!(out.cc, Cc::ZF);
    let out = alu(AluOp::Xor, 0, MIN);
    assert_eq!(out.cc, Cc::SF);
}

#[test]
fn condition_table() {
    let cases = [
        // cc, [always, le, l, e, ne, ge, g]
        (Cc::empty(), [true, false, false, false, true, true, true]),
        (Cc::ZF, [true, true, false, true, false, true, false]),
        (Cc::SF, [true, true, true, false, true, false, false]),
        (Cc::OF, [true, true, true, false, true, false, false]),
        (Cc::SF | Cc::OF, [true, false, false, false, true, true, true]),
    ];
    let conds = [Cond::Always, Cond::Le, Cond::L, Cond::E, Cond::Ne, Cond::Ge, Cond::G];
    for (cc, expect) in cases {
        for (cond, want) in conds.iter().zip(expect) {
            assert_eq!(cond.holds(cc), want, "{cond:?} with {cc:?}");
        }
    }
}

#[test]
fn ifun_mapping() {
    assert_eq!(Cond::from_ifun(6), Some(Cond::G));
    assert_eq!(Cond::from_ifun(7), None);
    assert_eq!(AluOp::from_ifun(3), Some(AluOp::Xor));
    assert_eq!(AluOp::from_ifun(4), None);
}
