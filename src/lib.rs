//! # `summation`
//! 級数の収束加速 (Aitken, Wynn, Levin, Weniger など) と一般化連分数の評価を行うライブラリ。
//! 特殊関数の級数展開や漸近展開を機械精度まで求めるための下回りとして使うことを想定している。

#[macro_use]
mod logging;

pub mod numerics;

mod error;
pub use error::*;

pub mod summation;

pub mod continued_fraction;

pub mod series;



/// このライブラリで定義された関数や型、トレイトなどにまとめてアクセスできるモジュール
/// `use summation::prelude::*;` とすることで全てのリソースがインポートされる
pub mod prelude {
	pub use super::{
		numerics::for_prelude::*,
		summation::for_prelude::*,
		continued_fraction::for_prelude::*,
		series::for_prelude::*,
		error::*
	};
}
/// このクレート内では、クレートで定義されたリソースを展開する
pub(crate) use prelude::*;
