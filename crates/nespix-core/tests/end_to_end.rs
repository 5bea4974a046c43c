mod common;

use anyhow::Result;
use nespix_core::{
    Ppu, System,
    ppu::{registers::Status, timing::Position},
    system::PPU_CYCLES_PER_CPU_CYCLE,
};

#[test]
fn boot_enable_nmi_and_acknowledge_vblank() -> Result<()> {
    let mut system = System::new();
    let ppu = system.attach(Ppu::new());
    system.power_on();

    // Too early: the write gate is still closed.
    ppu.borrow_mut().cpu_write(0x2000, 0x00);
    system.step_to(30_000);
    ppu.borrow_mut().cpu_write(0x2000, 0x80);
    assert!(ppu.borrow().control().vblank_nmi());

    system.step_to(Position::cycle_of(0, 241, 1));
    assert!(ppu.borrow().status().contains(Status::VBLANK));
    assert_eq!(system.nmi().raised_count(), 1);
    assert!(system.nmi().take_pending());

    let status = ppu.borrow_mut().cpu_read(0x2002);
    assert_eq!(status & 0x80, 0x80);
    assert!(!ppu.borrow().status().contains(Status::VBLANK));
    Ok(())
}

#[test]
fn host_drives_dma_and_frames_in_cpu_cycles() -> Result<()> {
    let mut system = System::new();
    let ppu = system.attach(Ppu::new());
    system.power_on();

    let mut ram = [0u8; 0x800];
    ram[0x300..0x304].copy_from_slice(&[0x10, 0x01, 0x00, 0x20]);
    ppu.borrow_mut().write_oam_dma(0x03, &mut ram);
    assert_eq!(&ppu.borrow().oam()[..4], &[0x10, 0x01, 0x00, 0x20]);

    // One CPU cycle is three dots.
    system.run_cpu_cycles(100);
    assert_eq!(ppu.borrow().cycle(), 100 * PPU_CYCLES_PER_CPU_CYCLE);

    let mut published = 0;
    for _ in 0..3 {
        system.run_cpu_cycles(29_781);
        if ppu.borrow_mut().take_frame_ready() {
            published += 1;
        }
    }
    assert_eq!(published, 3);
    Ok(())
}

#[test]
fn warm_reset_through_the_system_keeps_vram() {
    let mut system = System::new();
    let ppu = system.attach(Ppu::new());
    system.power_on();
    system.step_to(40_000);

    {
        let mut ppu = ppu.borrow_mut();
        ppu.cpu_write(0x2000, 0x80);
        common::write_via_ports(&mut ppu, 0x2345, &[0x77]);
    }
    system.reset();

    let ppu = ppu.borrow();
    assert!(!ppu.control().vblank_nmi());
    assert_eq!(ppu.read_byte(0x2345), 0x77);
    assert_eq!(ppu.cycle(), 40_000);
}
