pub mod badges;
pub mod input_buffer;
