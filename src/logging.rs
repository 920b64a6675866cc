//! ## `logging`
//! `logging` フィーチャーが有効な場合のみ `log` クレートに出力するマクロ群。
//! 無効な場合は何も出力せず、引数を使用済みとして扱うだけにする。

#[cfg(feature="logging")]
extern crate log;

/// 収束加速が退化して代わりの値に切り替えたときなど、頻繁に起こる事象を記録する
macro_rules! log_trace {
	($($arg:tt)+) => {
		#[cfg(feature="logging")]
		log::trace!($($arg)+);
		#[cfg(not(feature="logging"))]
		{ let _ = format_args!($($arg)+); }
	};
}

/// テーブルの再構築など、やや珍しい事象を記録する
macro_rules! log_debug {
	($($arg:tt)+) => {
		#[cfg(feature="logging")]
		log::debug!($($arg)+);
		#[cfg(not(feature="logging"))]
		{ let _ = format_args!($($arg)+); }
	};
}

/// 収束しなかったなど、呼び出し側が対処すべき事象を記録する
macro_rules! log_warn {
	($($arg:tt)+) => {
		#[cfg(feature="logging")]
		log::warn!($($arg)+);
		#[cfg(not(feature="logging"))]
		{ let _ = format_args!($($arg)+); }
	};
}
