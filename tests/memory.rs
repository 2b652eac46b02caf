use pretty_assertions::assert_eq;

use y86_rs::exec::SeqExecutor;
use y86_rs::isa::y86::Y86Decoder;
use y86_rs::memory::MemChange;
use y86_rs::{assemble_source, run_image, AsmConfig, Cpu, LinearMemory, RegId, SimConfig, Status, Trap};

// rmmovl / mrmovl: op, rA:rB, disp32
fn enc_mem(op: u8, ra: RegId, rb: RegId, disp: u32) -> Vec<u8> {
    let mut v = vec![op, ((ra as u8) << 4) | rb as u8];
    v.extend_from_slice(&disp.to_le_bytes());
    v
}

#[test]
fn store_then_load_with_displacement() {
    let mut code = enc_mem(0x40, RegId::Eax, RegId::Ebp, 8); // rmmovl %eax,8(%ebp)
    code.extend(enc_mem(0x50, RegId::Esi, RegId::Ebp, 8)); // mrmovl 8(%ebp),%esi
    let mut mem = LinearMemory::new(128);
    mem.load(&code).unwrap();

    let mut cpu = Cpu::new();
    cpu.set_reg(RegId::Eax, 0xCAFE_F00D);
    cpu.set_reg(RegId::Ebp, 0x40);
    let (dec, exec) = (Y86Decoder::new(), SeqExecutor);
    cpu.step(&mut mem, &dec, &exec).unwrap();
    cpu.step(&mut mem, &dec, &exec).unwrap();

    assert_eq!(cpu.reg(RegId::Esi), 0xCAFE_F00D);
    assert_eq!(&mem.mem[0x48..0x4C], &[0x0D, 0xF0, 0xFE, 0xCA]);
    assert_eq!(
        mem.diff(),
        vec![MemChange { addr: 0x48, old: 0, new: 0xCAFE_F00D }]
    );
}

#[test]
fn negative_displacement() {
    let code = enc_mem(0x50, RegId::Ecx, RegId::Esp, (-4i32) as u32); // mrmovl -4(%esp),%ecx
    let mut mem = LinearMemory::new(64);
    mem.load(&code).unwrap();
    mem.mem[0x1C..0x20].copy_from_slice(&77u32.to_le_bytes());

    let mut cpu = Cpu::new();
    cpu.set_reg(RegId::Esp, 0x20);
    cpu.step(&mut mem, &Y86Decoder::new(), &SeqExecutor).unwrap();
    assert_eq!(cpu.reg(RegId::Ecx), 77);
}

#[test]
fn faulting_store_leaves_state_untouched() {
    // pushl %eax with esp = 0 writes at 0xfffffffc
    let mut mem = LinearMemory::new(64);
    mem.load(&[0xA0, 0x0F]).unwrap();
    let mut cpu = Cpu::new();
    cpu.set_reg(RegId::Eax, 5);

    let err = cpu.step(&mut mem, &Y86Decoder::new(), &SeqExecutor).unwrap_err();
    assert!(matches!(err, Trap::InvalidAddress { addr: 0xFFFF_FFFC, .. }));
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.reg(RegId::Esp), 0);
    assert!(mem.diff().is_empty());
}

#[test]
fn load_past_end_of_memory() {
    let src = "
        irmovl $3998,%ebx
        mrmovl (%ebx),%eax
        halt
    ";
    let asm = assemble_source(src, AsmConfig::default()).unwrap();
    let r = run_image(asm.image.as_bytes(), SimConfig::default()).unwrap();
    assert_eq!(r.status, Status::InvalidAddress);
    assert_eq!(r.fault_addr, Some(3998));
    assert_eq!(r.pc, 6);
    assert_eq!(r.steps, 1);
    assert_eq!(r.regs[RegId::Eax.index()], 0);
}

#[test]
fn fetch_running_off_the_end() {
    // irmovl whose immediate would extend past a 4-byte memory
    let r = run_image(&[0x30, 0xF0, 0x01, 0x00], SimConfig { mem_size: 4 }).unwrap();
    assert_eq!(r.status, Status::InvalidAddress);
    assert_eq!(r.fault_addr, Some(4));
}

#[test]
fn image_larger_than_memory_is_rejected() {
    assert!(run_image(&[0u8; 16], SimConfig { mem_size: 8 }).is_err());
}
