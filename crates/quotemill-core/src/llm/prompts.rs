//! The two extraction prompts. Wording is load-bearing: the response
//! parsers in this module's siblings expect exactly the label format and
//! table headers requested here.

const DETAILS_INSTRUCTIONS: &str = r#"Extract the following details from the provided email content:

1. **Our Ref**: Extract the reference number mentioned in the message.
2. **Date**: Extract date in the email sent date in "Day, DD Month YYYY" format, if available in the email.
3. **To**: Extract the recipient's name and contact mentioned in the body, for example, "kindly address to Abella Jake Yabut @ 64138413".
4. **From**: Extract the sender's name from the body of the email, for example, "Hi Lionel".
5. **Subject/Prj Name**: Extract the project name or subject line mentioned in the message, such as "SSR2024-040: GMET-EDT Capacity Uplift".

Output the extracted details in the following structured format without any additional explanations:

**Our Ref**: [Extracted Reference Number]
**Date**: [Extracted Date]
**To**: [Recipient's Name and Contact]
**From**: [Sender's Name]
**Subject/Prj Name**: [Extracted Subject or Project Name]"#;

const TABLE_INSTRUCTIONS: &str = r"Extract the table from the following content. The table may be messy, unaligned, or embedded in an HTML format.
Use the following column headers exactly as given:
| Req. Ref. | Project | Site | Env. | Type | Items | Qty (GiB) |

Do not add any extra text or explanations. Output only the table in clean markdown format.";

#[must_use]
pub fn details_prompt(body: &str) -> String {
    format!("{DETAILS_INSTRUCTIONS}\n\nMessage:\n{body}")
}

#[must_use]
pub fn table_prompt(body: &str) -> String {
    format!("{TABLE_INSTRUCTIONS}\n\nMessage:\n{body}")
}
