use std::process::ExitCode;

extern crate bumpchain_allocator;

use bumpchain_allocator::{handle, AllocError};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AllocError> {
    let mut arena = Some(handle::create(None, 0)?);

    let ptr = handle::allocate(arena.as_ref(), 10)?;
    // SAFETY: 10 bytes were just allocated, and nothing else refers to them
    unsafe { ptr.as_ptr().copy_from_nonoverlapping(b"0123456789".as_ptr(), 10) };

    println!("----------------------------------------");
    println!("Used: {}", handle::total_used(arena.as_ref()));
    println!("Capacity: {}", handle::total_capacity(arena.as_ref()));

    if let Some(arena) = arena.as_mut() {
        let chunk = arena.iter_allocated_chunks().next().unwrap_or_default();
        // SAFETY: The only allocation was fully written above
        let bytes: Vec<u8> = chunk.iter().map(|b| unsafe { b.assume_init() }).collect();
        hexdump::hexdump(&bytes);
    }

    handle::reset(arena.as_mut());
    println!("Used after reset: {}", handle::total_used(arena.as_ref()));

    handle::destroy(arena.take());
    println!("Used after destroy: {}", handle::total_used(arena.as_ref()));
    Ok(())
}
