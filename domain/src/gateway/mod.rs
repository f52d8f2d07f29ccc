pub mod supabase;
pub mod telegram;
