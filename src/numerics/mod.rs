//! ## `numerics`
//! 級数の項として扱う数値型の抽象化と、呼び出し側が使う係数テーブルをまとめたモジュール

extern crate num;
pub use num::*;

mod term;
pub use term::*;

#[cfg(feature="coefficients")]
pub mod coefficients;



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::term::Term;
	pub use num::{
		Complex,
		Float,
		Zero,
		One
	};
	#[cfg(feature="coefficients")]
	pub use super::coefficients::{
		binomial_coefficient,
		bernoulli_number,
		bernoulli_2n
	};
}
