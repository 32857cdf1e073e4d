// Types shared by every layer. The TUI turns keys and clicks into
// `InputEvent`s, the middle layer turns those into scheduler calls, and the
// TUI draws whatever `DisplayState` the middle layer hands back each frame.
//
// Controls:
//   arrows        //  move the grid cursor
//   Enter/Space   //  RequestCell(cursor)
//   mouse click   //  RequestCell(clicked cell)
//   p             //  TogglePause
//   s             //  Stop
//   i             //  ToggleImmediateStop
//   Esc / q       //  Quit

pub const GRID_SIZE: usize = 6;
pub const NUM_CELLS: usize = GRID_SIZE * GRID_SIZE;

pub const BASS_BANK_SIZE: usize = 10;
pub const DRUM_BANK_SIZE: usize = 10;
pub const SOUNDS_BANK_SIZE: usize = 16;
pub const NUM_PADS: usize = BASS_BANK_SIZE + SOUNDS_BANK_SIZE + DRUM_BANK_SIZE;

// 2 measures of 4/4, fixed
pub const BEATS_PER_LOOP: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadCategory {
    Bass,
    Drum,
    Sounds,
}

impl PadCategory {
    pub const ALL: [PadCategory; 3] = [PadCategory::Bass, PadCategory::Drum, PadCategory::Sounds];

    /// How many pads of this category may sound at once.
    pub fn capacity(self) -> usize {
        match self {
            PadCategory::Bass => 1,
            PadCategory::Drum => 1,
            PadCategory::Sounds => 3,
        }
    }

    /// Number of samples in this category's bank.
    pub fn bank_size(self) -> usize {
        match self {
            PadCategory::Bass => BASS_BANK_SIZE,
            PadCategory::Drum => DRUM_BANK_SIZE,
            PadCategory::Sounds => SOUNDS_BANK_SIZE,
        }
    }

    /// File name stem of the bank on disk ("bass.1.3.wav").
    pub fn bank_name(self) -> &'static str {
        match self {
            PadCategory::Bass => "bass",
            PadCategory::Drum => "drum",
            PadCategory::Sounds => "sounds",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PadCategory::Bass => "bass",
            PadCategory::Drum => "drum",
            PadCategory::Sounds => "melody",
        }
    }
}

/// One pad: a category plus a zero-based slot in that category's bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PadConfig {
    pub category: PadCategory,
    pub slot: u8,
}

impl PadConfig {
    pub fn is_valid(&self) -> bool {
        (self.slot as usize) < self.category.bank_size()
    }

    // dense 0..NUM_PADS index for fixed-size per-pad tables
    pub fn table_index(&self) -> usize {
        let offset = match self.category {
            PadCategory::Bass => 0,
            PadCategory::Sounds => BASS_BANK_SIZE,
            PadCategory::Drum => BASS_BANK_SIZE + SOUNDS_BANK_SIZE,
        };
        offset + self.slot as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Playing,
    Paused,
    Stopped,
}

impl Lifecycle {
    pub fn label(self) -> &'static str {
        match self {
            Lifecycle::Idle => "IDLE",
            Lifecycle::Playing => "PLAY",
            Lifecycle::Paused => "PAUSE",
            Lifecycle::Stopped => "STOP",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    RequestCell(u8), // grid cell 0-35, row-major
    TogglePause,
    Stop,
    ToggleImmediateStop,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedState {
    Off,
    OnHigh,
    Blink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub pad: PadConfig,
    pub led: LedState,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub cells: [CellView; NUM_CELLS],
    pub lifecycle: Lifecycle,
    pub immediate_stop: bool,
    pub loop_progress: f64, // 0.0..1.0 through the current loop
    pub pulse: [bool; 3], // bass, drum, sounds; lit on the beat while playing
    pub blink_on: bool,   // phase for LedState::Blink, on wall time
    pub status_text: String,
}
