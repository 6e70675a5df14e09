// Hardware drivers — chip-level, board-independent.
//
// Pin assignments and calibration tables live in board/; drivers only
// see the hardware bundles handed to them.

pub mod input;
