// Engine modules: renderer, input, audio, frame scheduling

pub mod audio;
pub mod game_loop;
pub mod input;
pub mod renderer;
