use anyhow::{bail, Result};
use chip8vm::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    keyboard::KEYMAP,
    Emulator,
};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

pub struct Screen {
    pixel_buffer: Vec<u32>,
    pub window: Window,
}

fn scale_from(factor: u8) -> Result<Scale> {
    Ok(match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        16 => Scale::X16,
        32 => Scale::X32,
        other => bail!("unsupported scale {other}, pick one of 1, 2, 4, 8, 16, 32"),
    })
}

fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

impl Screen {
    pub fn new(scale: u8) -> Result<Self> {
        let mut window = Window::new(
            "chip8vm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: scale_from(scale)?,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![0; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
    }

    /// Mirrors the host keyboard into the emulator's keypad.
    pub fn sample_keys(&self, emu: &mut Emulator) {
        for (key, num) in KEYMAP {
            emu.set_key(num, self.window.is_key_down(key));
        }
    }

    fn paint(&mut self, fb: &FrameBuffer) {
        let (on, off) = (from_u16_rgb(0, 127, 255), from_u16_rgb(0, 0, 0));
        for (pixel, lit) in self.pixel_buffer.iter_mut().zip(fb.rows().iter().flatten()) {
            *pixel = if *lit { on } else { off };
        }
    }

    /// Uploads the screen when it changed, otherwise only pumps window events.
    pub fn sync(&mut self, emu: &mut Emulator) -> Result<()> {
        if emu.take_dirty() {
            self.paint(emu.framebuffer());
            self.window
                .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)?;
        } else {
            self.window.update();
        }
        Ok(())
    }
}
