//! 终端输入

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password};

/// 登录过程中需要用户输入的内容
pub trait LoginPrompt {
    /// 注册手机号
    fn phone_number(&mut self) -> Result<String>;
    /// 短信收到的 OTP（输入时不回显）
    fn otp(&mut self) -> Result<String>;
    /// 出错后询问是否重试
    fn confirm_retry(&mut self, message: &str) -> Result<bool>;
}

/// 基于 dialoguer 的终端输入
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl LoginPrompt for TerminalPrompt {
    fn phone_number(&mut self) -> Result<String> {
        Input::<String>::new()
            .with_prompt("请输入注册手机号")
            .interact_text()
            .context("读取手机号失败")
    }

    fn otp(&mut self) -> Result<String> {
        Password::new()
            .with_prompt("请输入收到的 OTP")
            .interact()
            .context("读取 OTP 失败")
    }

    fn confirm_retry(&mut self, message: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(format!("{}，是否重试？", message))
            .default(true)
            .interact()
            .context("读取确认失败")
    }
}
