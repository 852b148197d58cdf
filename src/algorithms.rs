pub mod akima;
