//! 课程实体定义
//!
//! 课程即目录条目：可购买的课时，带剩余名额（spaces）

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    /// 科目
    pub subject: String,
    /// 上课地点
    pub location: String,
    /// 单价，非负
    pub price: f64,
    /// 剩余名额
    pub spaces: i32,
    /// 图片相对路径，由静态资源层提供
    #[sqlx(default)]
    pub image: Option<String>,
}

impl Lesson {
    pub fn new(subject: impl Into<String>, location: impl Into<String>, price: f64, spaces: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            location: location.into(),
            price,
            spaces,
            image: None,
        }
    }

    /// 判断课程是否匹配搜索词
    ///
    /// 科目、地点、价格的十进制文本、余位的十进制文本，任一包含搜索词（忽略大小写）即匹配。
    /// 空搜索词匹配所有课程。
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            self.subject.to_lowercase(),
            self.location.to_lowercase(),
            float8_text(self.price),
            self.spaces.to_string(),
        ]
        .iter()
        .any(|field| field.contains(&needle))
    }
}

/// 按 PostgreSQL `float8::text` 的规则渲染浮点数
///
/// 最短往返表示；十进制指数小于 -4 或不小于 15 时用科学计数法，指数带符号且至少两位
/// （`1e16` -> `"1e+16"`，`0.00001` -> `"1e-05"`）。
fn float8_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return value.to_string();
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..15).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// 课程局部更新
///
/// 只覆盖提供了值的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LessonPatch {
    #[validate(length(min = 1, message = "科目不能为空"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "地点不能为空"))]
    pub location: Option<String>,
    #[validate(range(min = 0.0, message = "价格不能为负数"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "名额不能为负数"))]
    pub spaces: Option<i32>,
    pub image: Option<String>,
}

impl LessonPatch {
    /// 没有任何字段需要更新
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.location.is_none()
            && self.price.is_none()
            && self.spaces.is_none()
            && self.image.is_none()
    }

    /// 将局部更新应用到课程
    pub fn apply_to(&self, lesson: &mut Lesson) {
        if let Some(subject) = &self.subject {
            lesson.subject = subject.clone();
        }
        if let Some(location) = &self.location {
            lesson.location = location.clone();
        }
        if let Some(price) = self.price {
            lesson.price = price;
        }
        if let Some(spaces) = self.spaces {
            lesson.spaces = spaces;
        }
        if let Some(image) = &self.image {
            lesson.image = Some(image.clone());
        }
    }
}
